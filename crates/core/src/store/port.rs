use super::error::StoreError;
use async_trait::async_trait;

/// # Summary
/// 客户端持久化 KV 存储接口 (Port)，对应浏览器端的 localStorage。
///
/// # Invariants
/// - 键值均为 UTF-8 字符串，确保 Trait 是对象安全的 (Object Safe)。
/// - 实现者必须支持并发读写，写入后的下一次读取立即可见。
/// - 键的语义由上游模块管理，存储层不解释内容。
#[async_trait]
pub trait KvStore: Send + Sync {
    /// # Summary
    /// 读取指定键的值。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    ///
    /// # Returns
    /// 存在则返回 `Some(String)`，否则返回 `None`。
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// # Summary
    /// 写入键值对。
    ///
    /// # Logic
    /// 1. 若键已存在则覆盖旧值。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 待写入的值。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StoreError`。
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Summary
    /// 删除指定键。
    ///
    /// # Logic
    /// 1. 移除键值对；键不存在时同样视为成功。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    ///
    /// # Returns
    /// 成功返回 Ok。
    async fn del(&self, key: &str) -> Result<(), StoreError>;
}
