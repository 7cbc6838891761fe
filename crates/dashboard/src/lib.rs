//! # `tradeai-dashboard` - 看板视图模型
//!
//! 每个视图只依赖 `Arc<dyn DashboardApi>`，不直接接触会话存储。
//! 视图是普通结构体，通过 `&mut self` 修改状态，由调用方保证串行访问。

pub mod advisor;
pub mod auth;
pub mod bot;
pub mod chart;
pub mod error;
pub mod header;
pub mod portfolio;
pub mod ticker;
pub mod watchlist;
