use crate::common::TickerError;
use crate::store::error::StoreError;
use thiserror::Error;

/// 凭证被后端拒绝时展示给用户的提示
pub const SESSION_EXPIRED_MESSAGE: &str =
    "Your session may have expired. Please log out and log back in to use the AI Advisor.";

/// # Summary
/// API 客户端错误枚举，区分传输层、后端业务层与鉴权层三类失败。
///
/// # Invariants
/// - 客户端从不吞掉错误，所有失败都以本枚举返回给调用方。
/// - `Unauthorized` 仅出现在需要凭证的接口上 (HTTP 401/422)。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 网络不可达，或非 2xx 且响应体无可解析的错误信息
    #[error("Network error: {0}")]
    Transport(String),
    /// 后端返回的结构化错误信息，原样透传
    #[error("{message}")]
    Backend { status: u16, message: String },
    /// 受保护接口返回 401/422，调用方应提示重新登录
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },
    /// 2xx 响应体与预期结构不符
    #[error("Parse error: {0}")]
    Parse(String),
    /// 请求发出前即被本地校验拒绝
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// 本地凭证存储读写失败
    #[error("Session storage error: {0}")]
    Session(String),
}

impl ApiError {
    /// 是否应被解读为"会话已过期"
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// 后端给出的 HTTP 状态码 (若有)
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// # Summary
    /// 将错误映射为可直接展示的文案。
    ///
    /// # Logic
    /// 1. `Backend` 返回后端原文。
    /// 2. `Unauthorized` 返回会话过期提示。
    /// 3. 其余情况返回调用方给定的兜底文案。
    ///
    /// # Arguments
    /// * `fallback`: 兜底文案，例如 "Login failed. Please try again."。
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Backend { message, .. } => message.clone(),
            ApiError::Unauthorized { .. } => SESSION_EXPIRED_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Session(err.to_string())
    }
}

impl From<TickerError> for ApiError {
    fn from(err: TickerError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_mapping() {
        let backend = ApiError::Backend {
            status: 409,
            message: "Username already exists".to_string(),
        };
        assert_eq!(backend.user_message("Registration failed."), "Username already exists");
        assert_eq!(backend.to_string(), "Username already exists");

        let expired = ApiError::Unauthorized {
            status: 422,
            message: "Not enough segments".to_string(),
        };
        assert!(expired.is_session_expired());
        assert_eq!(expired.user_message("x"), SESSION_EXPIRED_MESSAGE);
        assert_eq!(expired.status(), Some(422));

        let transport = ApiError::Transport("connection refused".to_string());
        assert!(!transport.is_session_expired());
        assert_eq!(transport.user_message("Login failed."), "Login failed.");
        assert_eq!(transport.status(), None);
    }

    #[test]
    fn test_error_conversion() {
        let err: ApiError = StoreError::Database("locked".to_string()).into();
        assert!(matches!(err, ApiError::Session(_)));
        let err: ApiError = TickerError::Empty.into();
        assert!(matches!(err, ApiError::InvalidInput(_)));
    }
}
