use std::sync::Arc;
use tracing::{info, warn};
use tradeai_core::api::error::ApiError;
use tradeai_core::api::port::DashboardApi;

/// 未取到用户信息时的展示名
pub const GUEST_NAME: &str = "Guest User";

/// # Summary
/// 页头状态：风险告警与当前用户。
///
/// # Invariants
/// - 告警拉取失败时保留上一次的告警。
pub struct HeaderState {
    api: Arc<dyn DashboardApi>,
    alerts: Vec<String>,
    unread: bool,
    username: Option<String>,
}

impl HeaderState {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            alerts: Vec::new(),
            unread: false,
            username: None,
        }
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn has_unread(&self) -> bool {
        self.unread
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// 展示用的用户名，未知时显示 `Guest User`
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or(GUEST_NAME)
    }

    /// # Summary
    /// 应用一次告警轮询结果。
    ///
    /// # Logic
    /// 成功时替换告警，非空则标记为未读；失败只记录日志。
    pub fn refresh_alerts(&mut self, result: Result<Vec<String>, ApiError>) {
        match result {
            Ok(alerts) => {
                self.unread = !alerts.is_empty();
                self.alerts = alerts;
            }
            Err(e) => warn!("Error fetching alerts: {}", e),
        }
    }

    /// 主动拉取一次告警
    pub async fn poll_alerts(&mut self) {
        let result = self.api.get_risk_alerts().await;
        self.refresh_alerts(result);
    }

    /// 打开告警菜单，清除未读标记
    pub fn open_alerts(&mut self) {
        self.unread = false;
    }

    /// # Summary
    /// 加载当前用户名。
    ///
    /// # Logic
    /// 仅当后端返回非空用户名时更新；失败只记录日志。
    pub async fn load_user(&mut self) {
        match self.api.get_user_info().await {
            Ok(info) if !info.username.trim().is_empty() => self.username = Some(info.username),
            Ok(_) => {}
            Err(e) => warn!("Error fetching user info: {}", e),
        }
    }

    pub async fn logout(&mut self) -> Result<(), ApiError> {
        self.api.logout().await?;
        self.username = None;
        self.alerts.clear();
        self.unread = false;
        info!("Logged out from header");
        Ok(())
    }
}
