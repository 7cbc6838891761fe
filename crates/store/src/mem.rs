use async_trait::async_trait;
use dashmap::DashMap;
use tradeai_core::store::error::StoreError;
use tradeai_core::store::port::KvStore;

/// # Summary
/// 基于 DashMap 的内存 KV 存储实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 数据随进程退出而丢失，不提供持久化。
pub struct MemKvStore {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, String>,
}

impl MemKvStore {
    /// # Summary
    /// 创建一个空的 MemKvStore 实例。
    ///
    /// # Returns
    /// * `Self` - 初始化的存储实例。
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// 当前存储的键数量
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

impl Default for MemKvStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KvStore for MemKvStore {
    /// # Summary
    /// 获取键对应的值。
    ///
    /// # Logic
    /// 从哈希表中检索 Key 对应的引用，并将其克隆为独立的所有权对象返回。
    ///
    /// # Arguments
    /// * `key`: 唯一索引。
    ///
    /// # Returns
    /// * `Result<Option<String>, StoreError>` - 存在则返回克隆的数据，否则返回 None。
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    /// # Summary
    /// 写入键值对。
    ///
    /// # Logic
    /// 将 Key 与 Value 一并插入哈希表。若存在同名 Key 则覆盖。
    ///
    /// # Arguments
    /// * `key`: 唯一索引。
    /// * `value`: 待存入的值。
    ///
    /// # Returns
    /// * `Result<(), StoreError>` - 始终返回 Ok。
    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// # Summary
    /// 删除指定键。
    ///
    /// # Logic
    /// 从哈希表中执行原子移除操作。
    ///
    /// # Arguments
    /// * `key`: 待删除的唯一索引。
    ///
    /// # Returns
    /// * `Result<(), StoreError>` - 无论键是否存在均返回 Ok。
    async fn del(&self, key: &str) -> Result<(), StoreError> {
        self.storage.remove(key);
        Ok(())
    }
}
