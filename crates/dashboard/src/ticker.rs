use tracing::warn;
use tradeai_core::api::entity::TickerSnapshot;
use tradeai_core::api::error::ApiError;

/// 行情条中的一项（已格式化）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TapeEntry {
    pub name: String,
    pub value: String,
    pub change: String,
    pub is_negative: bool,
}

/// # Summary
/// 行情条展示名。
///
/// # Logic
/// 去掉 `.NS` 后缀，指数名 (`NIFTY 50`、`SENSEX`) 原样保留，空名称显示 `N/A`。
pub fn display_name(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return "N/A".to_string();
    }
    name.strip_suffix(".NS").unwrap_or(name).to_string()
}

/// 滚动行情条
#[derive(Debug, Clone)]
pub struct TickerTape {
    items: Vec<TickerSnapshot>,
    loading: bool,
}

impl Default for TickerTape {
    fn default() -> Self {
        Self::new()
    }
}

impl TickerTape {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// # Summary
    /// 应用一次轮询结果。
    ///
    /// # Logic
    /// 成功替换全部条目；失败清空条目并记录日志。两种情况都结束加载状态。
    pub fn apply(&mut self, result: Result<Vec<TickerSnapshot>, ApiError>) {
        match result {
            Ok(items) => self.items = items,
            Err(e) => {
                warn!("Error fetching tickers: {}", e);
                self.items.clear();
            }
        }
        self.loading = false;
    }

    pub fn entries(&self) -> Vec<TapeEntry> {
        self.items
            .iter()
            .map(|s| TapeEntry {
                name: display_name(&s.name),
                value: s.value_text(),
                change: s.change_text(),
                is_negative: s.is_negative,
            })
            .collect()
    }

    pub fn status_line(&self) -> String {
        if self.loading {
            return "Loading ticker data...".to_string();
        }
        if self.items.is_empty() {
            return "No ticker data available".to_string();
        }
        self.entries()
            .iter()
            .map(|e| format!("{} {} {}", e.name, e.value, e.change))
            .collect::<Vec<_>>()
            .join("  |  ")
    }
}
