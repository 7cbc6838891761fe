use thiserror::Error;

/// # Summary
/// 本地存储层错误枚举，处理数据库连接、文件系统与读写失败等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 数据库操作失败
    #[error("Database error: {0}")]
    Database(String),
    /// 数据目录创建或访问失败
    #[error("Io error: {0}")]
    Io(String),
    /// 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
