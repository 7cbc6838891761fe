//! # `tradeai-core` - 领域核心
//!
//! 定义 tradeAI 客户端的实体、DTO、错误枚举与端口 (Port)。
//! 本 crate 不做任何 I/O，具体实现位于 `tradeai-store` 与 `tradeai-client`。

pub mod common;
pub mod config;
pub mod session;

pub mod store {
    pub mod error;
    pub mod port;
}

pub mod api {
    pub mod entity;
    pub mod error;
    pub mod port;
}
