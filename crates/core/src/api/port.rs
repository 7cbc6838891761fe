use super::entity::{
    IndexQuote, LoginResponse, MessageResponse, StockAnalysis, TickerSnapshot, UserInfo,
};
use super::error::ApiError;
use crate::common::Ticker;
use async_trait::async_trait;

/// # Summary
/// 看板后端访问接口 (Port)，每个后端操作对应一个方法。
///
/// # Invariants
/// - 受保护的方法在调用时从会话槽读取凭证，不在内存中缓存。
/// - 公开方法从不携带凭证。
/// - 每次调用只尝试一次，不重试、不自动刷新凭证。
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// # Summary
    /// 注册新用户 (公开)。
    ///
    /// # Arguments
    /// * `username`: 非空用户名。
    /// * `password`: 非空密码。
    ///
    /// # Returns
    /// 后端确认信息，或 `ApiError`。
    async fn register(&self, username: &str, password: &str)
        -> Result<MessageResponse, ApiError>;

    /// # Summary
    /// 登录并持久化会话凭证 (公开)。
    ///
    /// # Logic
    /// 1. 提交用户名密码。
    /// 2. 仅当响应携带非空 `access_token` 时写入会话槽。
    /// 3. 任何失败都不触碰已有凭证。
    ///
    /// # Returns
    /// 登录响应，或 `ApiError`。
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError>;

    /// # Summary
    /// 清除本地会话凭证。
    async fn logout(&self) -> Result<(), ApiError>;

    /// # Summary
    /// 本地是否存有会话凭证（不代表后端仍然认可）。
    async fn is_authenticated(&self) -> Result<bool, ApiError>;

    /// 获取自选股列表 (受保护)
    async fn get_watchlist(&self) -> Result<Vec<String>, ApiError>;

    /// 添加自选股 (受保护)
    async fn add_stock_to_watchlist(&self, ticker: &Ticker) -> Result<MessageResponse, ApiError>;

    /// 删除自选股 (受保护)
    async fn remove_stock_from_watchlist(
        &self,
        ticker: &Ticker,
    ) -> Result<MessageResponse, ApiError>;

    /// 个股分析 (公开)
    async fn analyze_stock(&self, ticker: &Ticker) -> Result<StockAnalysis, ApiError>;

    /// # Summary
    /// 获取 AI 推荐 (受保护)。
    ///
    /// # Returns
    /// 推荐文本。凭证缺失或过期时返回 `ApiError::Unauthorized`，调用方据此提示重新登录。
    async fn get_recommendation(&self, query: &str) -> Result<String, ApiError>;

    /// 滚动行情条数据 (公开)
    async fn get_ticker_data(&self) -> Result<Vec<TickerSnapshot>, ApiError>;

    /// 风险告警 (受保护)
    async fn get_risk_alerts(&self) -> Result<Vec<String>, ApiError>;

    /// 当前用户信息 (受保护)
    async fn get_user_info(&self) -> Result<UserInfo, ApiError>;

    /// 大盘指数报价 (公开)
    async fn get_index_quote(&self) -> Result<IndexQuote, ApiError>;
}
