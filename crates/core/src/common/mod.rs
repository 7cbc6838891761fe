use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// # Summary
/// 证券代码解析错误。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    // 输入为空或仅包含空白
    #[error("Ticker is empty")]
    Empty,
    // 代码内部包含空白字符
    #[error("Ticker contains whitespace: {0}")]
    Whitespace(String),
}

/// # Summary
/// 证券代码实体，代表自选股或分析请求中的标的。
///
/// # Invariants
/// - 内部字符串非空、无空白且全部大写（后端入库时同样转为大写）。
/// - 交易所后缀 (如 `.NS`) 与指数前缀 (如 `^`) 原样保留。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// # Summary
    /// 规范化并构造证券代码。
    ///
    /// # Logic
    /// 1. 去除首尾空白。
    /// 2. 拒绝空串及内部含空白的输入。
    /// 3. 转为大写。
    ///
    /// # Arguments
    /// * `raw`: 用户输入的原始代码。
    ///
    /// # Returns
    /// 成功返回 `Ticker`，失败返回 `TickerError`。
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TickerError::Whitespace(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// 以字符串切片形式访问代码
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(value: Ticker) -> Self {
        value.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
