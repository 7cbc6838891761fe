use async_trait::async_trait;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use std::fs;
use std::path::Path;
use tracing::debug;
use tradeai_core::store::error::StoreError;
use tradeai_core::store::port::KvStore;

/// 默认会话数据库文件名
const DEFAULT_SESSION_DB: &str = "session.db";

/// KvStore 的 SQLite 实现。
///
/// # Summary
/// 在数据目录下的 SQLite 文件 (`session.db`) 中维护一张 `kv` 表，
/// 充当浏览器 localStorage 的本地替身，使登录状态跨进程保留。
///
/// # Invariants
/// * 表结构在存储实例创建时初始化。
/// * 所有操作均通过共享的 `SqlitePool` 执行，多个实例打开同一文件时读写互相可见。
pub struct SqliteKvStore {
    pool: SqlitePool,
}

impl SqliteKvStore {
    /// 打开（必要时创建）数据目录下的会话数据库。
    ///
    /// # Logic
    /// 1. 确保数据目录存在。
    /// 2. 配置 SQLite 连接选项，开启 `create_if_missing`。
    /// 3. 连接到数据库并执行 DDL 初始化 `kv` 表。
    ///
    /// # Arguments
    /// * `data_dir` - 数据根目录。
    ///
    /// # Returns
    /// * `Result<Self, StoreError>` - 存储实例或错误。
    pub async fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = data_dir.as_ref();
        fs::create_dir_all(root).map_err(|e| StoreError::Io(e.to_string()))?;

        let db_path = root.join(DEFAULT_SESSION_DB);
        debug!("Opening session store at {}", db_path.display());

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for SqliteKvStore {
    /// # Summary
    /// 读取键对应的值。
    ///
    /// # Logic
    /// 查询 `kv` 表。
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// # Summary
    /// 写入键值对。
    ///
    /// # Logic
    /// 执行 Upsert 操作，键已存在时覆盖旧值。
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO kv (key, value) VALUES (?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }

    /// # Summary
    /// 删除指定键，键不存在时同样返回成功。
    async fn del(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))?;
        Ok(())
    }
}
