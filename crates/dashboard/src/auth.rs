use std::sync::Arc;
use tracing::warn;
use tradeai_core::api::port::DashboardApi;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Please try again.";
pub const MISSING_FIELDS: &str = "Please enter both username and password.";

/// # Summary
/// 登录与注册表单。
///
/// # Invariants
/// - 返回给界面的错误文案要么是后端原文，要么是固定兜底文案。
/// - 空用户名或空密码在本地拦截，不发起请求。
pub struct AuthForm {
    api: Arc<dyn DashboardApi>,
    loading: bool,
}

impl AuthForm {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            loading: false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// # Summary
    /// 提交登录表单。
    ///
    /// # Logic
    /// 1. 本地校验非空。
    /// 2. 调用 `login`，凭证由客户端写入会话槽。
    /// 3. 失败时映射为展示文案。
    ///
    /// # Returns
    /// 成功返回 `Ok(())`，失败返回可直接展示的错误文案。
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), String> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(MISSING_FIELDS.to_string());
        }

        self.loading = true;
        let result = self.api.login(username.trim(), password).await;
        self.loading = false;

        result.map(|_| ()).map_err(|e| {
            warn!("Login failed: {}", e);
            e.user_message(LOGIN_FAILED)
        })
    }

    /// # Summary
    /// 提交注册表单。
    ///
    /// # Returns
    /// 成功返回 `"<后端提示>. Redirecting to login..."`，失败返回错误文案。
    pub async fn register(&mut self, username: &str, password: &str) -> Result<String, String> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(MISSING_FIELDS.to_string());
        }

        self.loading = true;
        let result = self.api.register(username.trim(), password).await;
        self.loading = false;

        match result {
            Ok(response) => {
                let message = response.message.trim_end_matches('.');
                let message = if message.is_empty() {
                    "Registration successful"
                } else {
                    message
                };
                Ok(format!("{}. Redirecting to login...", message))
            }
            Err(e) => {
                warn!("Registration failed: {}", e);
                Err(e.user_message(REGISTER_FAILED))
            }
        }
    }
}
