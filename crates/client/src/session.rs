use std::sync::Arc;
use tracing::{debug, info};
use tradeai_core::session::{Credential, LEGACY_SESSION_KEY, SESSION_KEY};
use tradeai_core::store::error::StoreError;
use tradeai_core::store::port::KvStore;

/// # Summary
/// 会话凭证槽，全进程唯一负责读写 `accessToken` 的模块。
///
/// # Invariants
/// - 每次访问都直达底层 `KvStore`，不在内存中缓存凭证，
///   因此其他实例（或其他进程）写入的新凭证在下一次调用即生效。
/// - 旧键 `token` 只在 `migrate_legacy` 中被读取。
#[derive(Clone)]
pub struct SessionSlot {
    store: Arc<dyn KvStore>,
}

impl SessionSlot {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// # Summary
    /// 读取当前凭证。
    ///
    /// # Logic
    /// 1. 读取 `accessToken`。
    /// 2. 空白值视为不存在。
    ///
    /// # Returns
    /// 存在返回 `Some(Credential)`，否则返回 `None`。
    pub async fn current(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.store.get(SESSION_KEY).await?.and_then(Credential::new))
    }

    /// 写入凭证，覆盖已有值
    pub async fn store(&self, credential: &Credential) -> Result<(), StoreError> {
        self.store.set(SESSION_KEY, credential.expose()).await?;
        debug!("Credential stored under {}", SESSION_KEY);
        Ok(())
    }

    /// # Summary
    /// 清除凭证（登出）。
    ///
    /// # Logic
    /// 同时删除旧键，防止后续迁移把已登出的凭证重新启用。
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.del(SESSION_KEY).await?;
        self.store.del(LEGACY_SESSION_KEY).await?;
        info!("Session credential cleared");
        Ok(())
    }

    pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.current().await?.is_some())
    }

    /// # Summary
    /// 将旧键 `token` 中的凭证迁移到 `accessToken`。
    ///
    /// # Logic
    /// 1. 旧键不存在时直接返回。
    /// 2. 新键为空且旧值合法时，写入新键。
    /// 3. 无论是否采用，都删除旧键；新键已有值时以新键为准。
    ///
    /// # Returns
    /// 旧凭证被采用返回 `true`。
    pub async fn migrate_legacy(&self) -> Result<bool, StoreError> {
        let Some(legacy) = self.store.get(LEGACY_SESSION_KEY).await? else {
            return Ok(false);
        };

        let mut adopted = false;
        if self.current().await?.is_none() {
            if let Some(credential) = Credential::new(legacy) {
                self.store(&credential).await?;
                adopted = true;
            }
        }

        self.store.del(LEGACY_SESSION_KEY).await?;
        info!(adopted, "Legacy session key migrated");
        Ok(adopted)
    }
}
