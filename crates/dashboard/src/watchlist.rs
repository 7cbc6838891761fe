use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};
use tradeai_core::api::entity::StockAnalysis;
use tradeai_core::api::port::DashboardApi;
use tradeai_core::common::Ticker;

/// 自选股表格中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistRow {
    pub analysis: StockAnalysis,
}

impl WatchlistRow {
    pub fn ticker(&self) -> &str {
        &self.analysis.ticker
    }

    pub fn last_close(&self) -> f64 {
        self.analysis.last_close_price
    }

    pub fn price_change(&self) -> f64 {
        self.analysis.price_change()
    }

    pub fn is_negative(&self) -> bool {
        self.analysis.is_negative()
    }

    /// 带符号的涨跌额，例如 `+1.50`、`-2.25`
    pub fn change_text(&self) -> String {
        format!("{:+.2}", self.price_change())
    }

    pub fn headline(&self) -> &str {
        self.analysis.headline()
    }
}

/// # Summary
/// 自选股视图。
///
/// # Invariants
/// - `rows` 的顺序与后端返回的自选股顺序一致。
/// - 分析失败的代码被丢弃，不影响其他行。
pub struct WatchlistView {
    api: Arc<dyn DashboardApi>,
    rows: Vec<WatchlistRow>,
    loading: bool,
    error: Option<String>,
}

impl WatchlistView {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self {
            api,
            rows: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn rows(&self) -> &[WatchlistRow] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 最近一次操作的错误文案
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// # Summary
    /// 重新拉取自选股并并发分析每一个代码。
    ///
    /// # Logic
    /// 1. 获取自选股列表，失败则保留旧数据并返回错误。
    /// 2. 跳过无法规范化的代码。
    /// 3. 使用 `join_all` 并发分析，按原顺序收集成功的结果。
    ///
    /// # Returns
    /// 失败返回 `"Failed to load watchlist: ..."`。
    pub async fn refresh(&mut self) -> Result<(), String> {
        self.loading = true;
        let result = self.load_rows().await;
        self.loading = false;

        match result {
            Ok(rows) => {
                debug!("Watchlist refreshed with {} rows", rows.len());
                self.rows = rows;
                self.error = None;
                Ok(())
            }
            Err(message) => {
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }

    async fn load_rows(&self) -> Result<Vec<WatchlistRow>, String> {
        let raw = self
            .api
            .get_watchlist()
            .await
            .map_err(|e| format!("Failed to load watchlist: {}", e))?;

        let tickers: Vec<Ticker> = raw
            .iter()
            .filter_map(|t| match Ticker::parse(t) {
                Ok(ticker) => Some(ticker),
                Err(e) => {
                    warn!("Skipping watchlist entry {:?}: {}", t, e);
                    None
                }
            })
            .collect();

        let analyses = join_all(tickers.iter().map(|t| self.api.analyze_stock(t))).await;

        Ok(tickers
            .iter()
            .zip(analyses)
            .filter_map(|(ticker, result)| match result {
                Ok(analysis) => Some(WatchlistRow { analysis }),
                Err(e) => {
                    warn!("Could not analyze ticker {}: {}", ticker, e);
                    None
                }
            })
            .collect())
    }

    /// # Summary
    /// 添加自选股后刷新。
    ///
    /// # Logic
    /// 空白输入直接忽略；其余输入规范化为大写代码后提交。
    pub async fn add(&mut self, raw: &str) -> Result<(), String> {
        if raw.trim().is_empty() {
            return Ok(());
        }
        let label = raw.trim().to_uppercase();
        let outcome = match Ticker::parse(raw) {
            Ok(ticker) => self
                .api
                .add_stock_to_watchlist(&ticker)
                .await
                .map_err(|e| format!("Failed to add {}: {}", ticker, e)),
            Err(e) => Err(format!("Failed to add {}: {}", label, e)),
        };

        if let Err(message) = outcome {
            self.error = Some(message.clone());
            return Err(message);
        }
        self.refresh().await
    }

    /// 删除自选股后刷新
    pub async fn remove(&mut self, raw: &str) -> Result<(), String> {
        let label = raw.trim().to_uppercase();
        let outcome = match Ticker::parse(raw) {
            Ok(ticker) => self
                .api
                .remove_stock_from_watchlist(&ticker)
                .await
                .map_err(|e| format!("Failed to remove {}: {}", ticker, e)),
            Err(e) => Err(format!("Failed to remove {}: {}", label, e)),
        };

        if let Err(message) = outcome {
            self.error = Some(message.clone());
            return Err(message);
        }
        self.refresh().await
    }
}
