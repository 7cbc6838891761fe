//! # 后端接口 DTO
//!
//! 与后端 JSON 报文一一对应的请求/响应结构体。
//! 字段命名遵循 Rust 习惯，通过 serde rename 映射 camelCase 线上格式。

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================
//  鉴权相关 DTO
// ============================================================

/// 注册与登录共用的请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
}

/// 仅携带提示信息的通用响应 (注册、自选股增删)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// 登录响应
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: String,
}

/// 当前登录用户信息
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    #[serde(default)]
    pub username: String,
}

// ============================================================
//  自选股与分析 DTO
// ============================================================

/// 自选股列表响应
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchlistResponse {
    #[serde(default)]
    pub tickers: Vec<String>,
}

/// 携带单个证券代码的请求体 (添加自选股、个股分析)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TickerRequest {
    pub ticker: String,
}

/// 后端统一的 `{ "data": ... }` 外层包装
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// 个股走势数据，`labels` 与 `prices` 按下标一一对应 (日期 `YYYY-MM-DD`)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub prices: Vec<f64>,
}

/// # Summary
/// 个股分析结果，全部字段来源于后端。
///
/// # Invariants
/// - `chart_data.prices` 按时间先后排序，最后一个点即最近收盘。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockAnalysis {
    pub ticker: String,
    #[serde(rename = "lastClosePrice")]
    pub last_close_price: f64,
    /// 年化历史波动率
    #[serde(rename = "historicalVolatility", default)]
    pub historical_volatility: Option<f64>,
    #[serde(rename = "sharpeRatio", default)]
    pub sharpe_ratio: Option<f64>,
    /// 风险模型预测的未来波动率
    #[serde(rename = "predictedVolatility", default)]
    pub predicted_volatility: Option<f64>,
    #[serde(rename = "chartData", default)]
    pub chart_data: ChartData,
    #[serde(rename = "aiSummary", default)]
    pub ai_summary: Option<String>,
}

impl StockAnalysis {
    /// # Summary
    /// 计算最近收盘价相对前一个价格点的涨跌额。
    ///
    /// # Logic
    /// 1. 价格点不足两个时返回 0。
    /// 2. 否则返回 `last_close_price - prices[len - 2]`。
    pub fn price_change(&self) -> f64 {
        let prices = &self.chart_data.prices;
        if prices.len() > 1 {
            self.last_close_price - prices[prices.len() - 2]
        } else {
            0.0
        }
    }

    pub fn is_negative(&self) -> bool {
        self.price_change() < 0.0
    }

    /// AI 摘要的第一句话，缺失时返回占位文案
    pub fn headline(&self) -> &str {
        match self.ai_summary.as_deref() {
            Some(summary) if !summary.is_empty() => summary.split('.').next().unwrap_or(summary),
            _ => "No summary available.",
        }
    }
}

/// # Summary
/// `/analyze` 响应中 `data` 字段的两种形态。
///
/// # Invariants
/// - 分析失败时后端仍返回 HTTP 200，`data` 仅含 `error` 字段。
/// - `Failed` 必须排在前面：成功报文不含 `error`，只会匹配 `Ready`。
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Failed { error: String },
    Ready(StockAnalysis),
}

// ============================================================
//  AI 顾问与行情 DTO
// ============================================================

/// AI 推荐请求体
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendRequest {
    pub query: String,
}

/// # Summary
/// AI 推荐响应。
///
/// # Invariants
/// - 新版后端使用 `recommendation` 字段，旧版使用 `response`，优先取前者。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendation: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl RecommendationResponse {
    /// 返回第一个非空的推荐文本
    pub fn into_text(self) -> String {
        self.recommendation
            .filter(|s| !s.is_empty())
            .or(self.response.filter(|s| !s.is_empty()))
            .unwrap_or_default()
    }
}

/// # Summary
/// 滚动行情条中的单个快照。
///
/// # Invariants
/// - `value` 与 `change` 在线上可能是字符串也可能是数字，原样保留为 JSON 值，仅在展示时转为文本。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TickerSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub change: Value,
    #[serde(rename = "isNegative", default)]
    pub is_negative: bool,
}

impl TickerSnapshot {
    pub fn value_text(&self) -> String {
        display_value(&self.value)
    }

    pub fn change_text(&self) -> String {
        display_value(&self.change)
    }
}

// 缺失值统一展示为 "--"
fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "--".to_string(),
        Value::String(s) if s.is_empty() => "--".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 风险告警响应
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RiskAlertsResponse {
    #[serde(default)]
    pub alerts: Vec<String>,
}

/// 大盘指数当日报价
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexQuote {
    pub price: f64,
    #[serde(default)]
    pub open: f64,
    #[serde(default)]
    pub high: f64,
    #[serde(default)]
    pub low: f64,
    #[serde(default)]
    pub volume: u64,
}

/// # Summary
/// 后端错误响应体。
///
/// # Invariants
/// - 业务层使用 `message`，JWT 鉴权层使用 `msg`，部分接口使用 `error`，按此顺序取第一个非空值。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        [self.message, self.msg, self.error]
            .into_iter()
            .flatten()
            .find(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(last: f64, prices: Vec<f64>, summary: Option<&str>) -> StockAnalysis {
        StockAnalysis {
            ticker: "TCS.NS".to_string(),
            last_close_price: last,
            historical_volatility: None,
            sharpe_ratio: None,
            predicted_volatility: None,
            chart_data: ChartData {
                labels: Vec::new(),
                prices,
            },
            ai_summary: summary.map(str::to_string),
        }
    }

    #[test]
    fn test_price_change_uses_previous_point() {
        let a = analysis(105.0, vec![100.0, 102.0, 105.0], None);
        assert_eq!(a.price_change(), 3.0);
        assert!(!a.is_negative());

        let b = analysis(98.5, vec![100.0, 98.5], None);
        assert_eq!(b.price_change(), -1.5);
        assert!(b.is_negative());
    }

    #[test]
    fn test_price_change_needs_two_points() {
        assert_eq!(analysis(10.0, vec![10.0], None).price_change(), 0.0);
        assert_eq!(analysis(10.0, vec![], None).price_change(), 0.0);
    }

    #[test]
    fn test_headline() {
        let a = analysis(1.0, vec![], Some("Strong momentum. Buy on dips."));
        assert_eq!(a.headline(), "Strong momentum");
        assert_eq!(analysis(1.0, vec![], None).headline(), "No summary available.");
        assert_eq!(analysis(1.0, vec![], Some("")).headline(), "No summary available.");
    }

    #[test]
    fn test_analysis_wire_format() {
        let json = r#"{"ticker":"INFY.NS","lastClosePrice":1500.5,"historicalVolatility":0.214,"sharpeRatio":1.37,"predictedVolatility":0.198,"chartData":{"labels":["2024-05-30","2024-05-31"],"prices":[1490.0,1500.5]},"aiSummary":"Stable."}"#;
        let a: StockAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(a.last_close_price, 1500.5);
        assert_eq!(a.historical_volatility, Some(0.214));
        assert_eq!(a.sharpe_ratio, Some(1.37));
        assert_eq!(a.predicted_volatility, Some(0.198));
        assert_eq!(a.chart_data.labels, vec!["2024-05-30", "2024-05-31"]);
        assert_eq!(a.chart_data.prices.len(), 2);

        // 风险指标缺失时不影响解码
        let minimal: StockAnalysis =
            serde_json::from_str(r#"{"ticker":"X","lastClosePrice":1.0}"#).unwrap();
        assert!(minimal.predicted_volatility.is_none());
        assert!(minimal.chart_data.labels.is_empty());
    }

    #[test]
    fn test_analysis_payload_shapes() {
        let failed: DataEnvelope<AnalysisPayload> = serde_json::from_str(
            r#"{"status":"success","data":{"error":"Invalid ticker or no data available."}}"#,
        )
        .unwrap();
        assert_eq!(
            failed.data,
            AnalysisPayload::Failed {
                error: "Invalid ticker or no data available.".to_string()
            }
        );

        let ready: DataEnvelope<AnalysisPayload> = serde_json::from_str(
            r#"{"status":"success","data":{"ticker":"TCS.NS","lastClosePrice":3900.0}}"#,
        )
        .unwrap();
        match ready.data {
            AnalysisPayload::Ready(a) => assert_eq!(a.ticker, "TCS.NS"),
            other => panic!("unexpected payload: {:?}", other),
        }
    }

    #[test]
    fn test_recommendation_prefers_primary_field() {
        let r: RecommendationResponse =
            serde_json::from_str(r#"{"recommendation":"Hold","response":"Sell"}"#).unwrap();
        assert_eq!(r.into_text(), "Hold");
        let r: RecommendationResponse = serde_json::from_str(r#"{"response":"Sell"}"#).unwrap();
        assert_eq!(r.into_text(), "Sell");
        let r: RecommendationResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(r.into_text(), "");
    }

    #[test]
    fn test_ticker_snapshot_display() {
        let s: TickerSnapshot = serde_json::from_str(
            r#"{"name":"RELIANCE.NS","value":2950.1,"change":"-0.42%","isNegative":true}"#,
        )
        .unwrap();
        assert_eq!(s.value_text(), "2950.1");
        assert_eq!(s.change_text(), "-0.42%");

        let empty: TickerSnapshot = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert_eq!(empty.value_text(), "--");
        assert!(!empty.is_negative);
    }

    #[test]
    fn test_error_body_field_priority() {
        let b: ErrorBody = serde_json::from_str(r#"{"msg":"Missing Authorization Header"}"#).unwrap();
        assert_eq!(b.into_message().as_deref(), Some("Missing Authorization Header"));
        let b: ErrorBody = serde_json::from_str(r#"{"message":"","error":"boom"}"#).unwrap();
        assert_eq!(b.into_message().as_deref(), Some("boom"));
        let b: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(b.into_message().is_none());
    }
}
