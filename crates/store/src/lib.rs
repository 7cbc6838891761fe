//! # `tradeai-store` - 本地 KV 存储实现
//!
//! 为 `tradeai_core::store::port::KvStore` 提供两种适配器：
//! - [`mem::MemKvStore`]：进程内 DashMap，适用于测试与一次性会话。
//! - [`sqlite::SqliteKvStore`]：SQLite 文件持久化，跨进程保留登录状态。

pub mod mem;
pub mod sqlite;
