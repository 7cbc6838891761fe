use crate::error::DashboardError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// 自动交易策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "Momentum Trading")]
    Momentum,
    #[serde(rename = "Trend Following")]
    TrendFollowing,
    #[serde(rename = "Scalping")]
    Scalping,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Momentum => "Momentum Trading",
            Strategy::TrendFollowing => "Trend Following",
            Strategy::Scalping => "Scalping",
        };
        f.write_str(name)
    }
}

/// # Summary
/// 交易机器人配置。
///
/// # Invariants
/// - `max_trade_size` 大于 0。
/// - `risk_level` 位于 0..=100。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeConfig {
    pub strategy: Strategy,
    pub max_trade_size: Decimal,
    pub risk_level: u8,
    pub stop_loss_enabled: bool,
    pub take_profit_enabled: bool,
    pub trailing_stop_enabled: bool,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Momentum,
            max_trade_size: Decimal::from(5000),
            risk_level: 50,
            stop_loss_enabled: true,
            take_profit_enabled: true,
            trailing_stop_enabled: false,
        }
    }
}

impl TradeConfig {
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.max_trade_size <= Decimal::ZERO {
            return Err(DashboardError::InvalidConfig(
                "max trade size must be positive".to_string(),
            ));
        }
        if self.risk_level > 100 {
            return Err(DashboardError::InvalidConfig(format!(
                "risk level {} is outside 0..=100",
                self.risk_level
            )));
        }
        Ok(())
    }
}

/// # Summary
/// 交易机器人控制面板，仅维护本地状态。
///
/// # Invariants
/// - 当前配置总是通过校验的。
#[derive(Debug, Clone)]
pub struct BotControl {
    active: bool,
    config: TradeConfig,
}

impl Default for BotControl {
    fn default() -> Self {
        Self {
            active: true,
            config: TradeConfig::default(),
        }
    }
}

impl BotControl {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn config(&self) -> &TradeConfig {
        &self.config
    }

    /// 切换运行状态，返回切换后的状态
    pub fn toggle(&mut self) -> bool {
        self.active = !self.active;
        info!(active = self.active, "Trading bot toggled");
        self.active
    }

    /// # Summary
    /// 替换配置。
    ///
    /// # Logic
    /// 校验失败时保留原配置。
    pub fn update(&mut self, config: TradeConfig) -> Result<(), DashboardError> {
        config.validate()?;
        info!(strategy = %config.strategy, risk = config.risk_level, "Trading bot config updated");
        self.config = config;
        Ok(())
    }
}
