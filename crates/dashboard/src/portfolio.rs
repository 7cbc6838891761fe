use crate::error::DashboardError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// # Summary
/// 单个持仓。
///
/// # Invariants
/// - `shares` 大于 0，两个价格均不为负。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub name: String,
    pub shares: Decimal,
    pub avg_price: Decimal,
    pub current_price: Decimal,
}

impl Holding {
    /// # Summary
    /// 创建持仓并校验数值。
    ///
    /// # Returns
    /// 数值非法返回 `DashboardError::InvalidInput`。
    pub fn new(
        symbol: &str,
        name: &str,
        shares: Decimal,
        avg_price: Decimal,
        current_price: Decimal,
    ) -> Result<Self, DashboardError> {
        if symbol.trim().is_empty() {
            return Err(DashboardError::InvalidInput("symbol must not be empty".to_string()));
        }
        if shares <= Decimal::ZERO {
            return Err(DashboardError::InvalidInput(format!(
                "{}: shares must be positive",
                symbol
            )));
        }
        if avg_price.is_sign_negative() || current_price.is_sign_negative() {
            return Err(DashboardError::InvalidInput(format!(
                "{}: prices must not be negative",
                symbol
            )));
        }
        Ok(Self {
            symbol: symbol.trim().to_uppercase(),
            name: name.to_string(),
            shares,
            avg_price,
            current_price,
        })
    }

    /// 市值 = 股数 × 现价
    pub fn value(&self) -> Decimal {
        self.shares * self.current_price
    }

    /// 成本 = 股数 × 均价
    pub fn cost(&self) -> Decimal {
        self.shares * self.avg_price
    }

    /// 浮动盈亏 = (现价 - 均价) × 股数
    pub fn gain(&self) -> Decimal {
        (self.current_price - self.avg_price) * self.shares
    }

    /// 收益率（百分比），均价为 0 时无意义
    pub fn gain_percent(&self) -> Option<Decimal> {
        if self.avg_price.is_zero() {
            return None;
        }
        Some((self.current_price - self.avg_price) / self.avg_price * Decimal::ONE_HUNDRED)
    }
}

/// 展示用的两位小数
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 持仓组合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Portfolio {
    holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.holdings
    }

    /// 同一代码的持仓会被替换
    pub fn upsert(&mut self, holding: Holding) {
        match self.holdings.iter_mut().find(|h| h.symbol == holding.symbol) {
            Some(existing) => *existing = holding,
            None => self.holdings.push(holding),
        }
    }

    pub fn total_value(&self) -> Decimal {
        self.holdings.iter().map(Holding::value).sum()
    }

    pub fn total_cost(&self) -> Decimal {
        self.holdings.iter().map(Holding::cost).sum()
    }

    pub fn total_gain(&self) -> Decimal {
        self.holdings.iter().map(Holding::gain).sum()
    }

    /// 组合整体收益率，总成本为 0 时返回 None
    pub fn total_gain_percent(&self) -> Option<Decimal> {
        let cost = self.total_cost();
        if cost.is_zero() {
            return None;
        }
        Some(self.total_gain() / cost * Decimal::ONE_HUNDRED)
    }

    /// # Summary
    /// 演示用持仓。
    ///
    /// # Logic
    /// 后端没有持仓接口，看板以固定的六只股票展示组合页面。
    pub fn sample() -> Self {
        let rows: [(&str, &str, i64, i64, i64); 6] = [
            ("AAPL", "Apple Inc.", 50, 16550, 17825),
            ("MSFT", "Microsoft Corp.", 30, 35000, 37891),
            ("GOOGL", "Alphabet Inc.", 25, 14000, 14180),
            ("TSLA", "Tesla Inc.", 20, 22000, 24284),
            ("JPM", "JPMorgan Chase", 40, 14500, 15830),
            ("JNJ", "Johnson & Johnson", 35, 16000, 16575),
        ];
        let holdings = rows
            .iter()
            .map(|&(symbol, name, shares, avg, current)| Holding {
                symbol: symbol.to_string(),
                name: name.to_string(),
                shares: Decimal::from(shares),
                avg_price: Decimal::new(avg, 2),
                current_price: Decimal::new(current, 2),
            })
            .collect();
        Self { holdings }
    }
}
