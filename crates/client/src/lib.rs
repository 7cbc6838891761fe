//! # `tradeai-client` - 后端访问层
//!
//! - [`session::SessionSlot`]：会话凭证的唯一读写入口。
//! - [`http::HttpDashboardClient`]：基于 `reqwest` 的 `DashboardApi` 实现。
//! - [`poll::Poller`]：可取消、单请求在途的定时轮询器。

pub mod http;
pub mod poll;
pub mod session;
