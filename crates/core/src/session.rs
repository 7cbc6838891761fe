use serde::{Deserialize, Serialize};

/// 会话凭证在本地 KV 存储中的唯一键
pub const SESSION_KEY: &str = "accessToken";

/// 旧版本写入同一凭证时使用的键，仅作为迁移来源读取
pub const LEGACY_SESSION_KEY: &str = "token";

/// # Summary
/// 会话凭证实体，即登录成功后后端签发的 Bearer Token。
///
/// # Invariants
/// - 内容为非空的不透明字符串，客户端不解析其结构。
/// - `Debug` 输出不暴露原文，避免凭证进入日志。
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential(String);

impl Credential {
    /// # Summary
    /// 从原始字符串构造凭证。
    ///
    /// # Logic
    /// 去除首尾空白后若为空则返回 None。
    ///
    /// # Arguments
    /// * `raw`: 后端返回或存储中读出的 token。
    ///
    /// # Returns
    /// 合法返回 `Some(Credential)`，否则返回 `None`。
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == raw.len() {
            Some(Self(raw))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// 返回 token 原文，仅用于组装 Authorization 头与持久化
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credential(***{} chars)", self.0.len())
    }
}
