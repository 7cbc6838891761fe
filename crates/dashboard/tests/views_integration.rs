use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tradeai_core::api::entity::{
    ChartData, IndexQuote, LoginResponse, MessageResponse, StockAnalysis, TickerSnapshot, UserInfo,
};
use tradeai_core::api::error::{ApiError, SESSION_EXPIRED_MESSAGE};
use tradeai_core::api::port::DashboardApi;
use tradeai_core::common::Ticker;
use tradeai_dashboard::advisor::{AdvisorChat, GREETING, NO_ANSWER, SERVICE_ERROR, Sender};
use tradeai_dashboard::auth::{AuthForm, LOGIN_FAILED, MISSING_FIELDS, REGISTER_FAILED};
use tradeai_dashboard::header::HeaderState;
use tradeai_dashboard::watchlist::WatchlistView;

/// 可编程的内存后端
#[derive(Default)]
struct MockApi {
    watchlist: Mutex<Vec<String>>,
    broken_tickers: Vec<String>,
    watchlist_error: Option<ApiError>,
    login_error: Option<ApiError>,
    register_error: Option<ApiError>,
    recommendation: Mutex<Option<Result<String, ApiError>>>,
    alerts: Mutex<Option<Result<Vec<String>, ApiError>>>,
    username: String,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl MockApi {
    fn hit(&self, op: &'static str) {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
    }

    fn count(&self, op: &'static str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or_default()
    }
}

#[async_trait]
impl DashboardApi for MockApi {
    async fn register(&self, _username: &str, _password: &str) -> Result<MessageResponse, ApiError> {
        self.hit("register");
        match &self.register_error {
            Some(e) => Err(e.clone()),
            None => Ok(MessageResponse {
                message: "User created successfully".to_string(),
            }),
        }
    }

    async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ApiError> {
        self.hit("login");
        match &self.login_error {
            Some(e) => Err(e.clone()),
            None => Ok(LoginResponse {
                access_token: format!("tok-{}", username),
            }),
        }
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.hit("logout");
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(true)
    }

    async fn get_watchlist(&self) -> Result<Vec<String>, ApiError> {
        self.hit("get_watchlist");
        match &self.watchlist_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.watchlist.lock().unwrap().clone()),
        }
    }

    async fn add_stock_to_watchlist(&self, ticker: &Ticker) -> Result<MessageResponse, ApiError> {
        self.hit("add");
        let mut list = self.watchlist.lock().unwrap();
        if list.iter().any(|t| t == ticker.as_str()) {
            return Err(ApiError::Backend {
                status: 409,
                message: "Stock already in watchlist".to_string(),
            });
        }
        list.push(ticker.to_string());
        Ok(MessageResponse::default())
    }

    async fn remove_stock_from_watchlist(&self, ticker: &Ticker) -> Result<MessageResponse, ApiError> {
        self.hit("remove");
        self.watchlist.lock().unwrap().retain(|t| t != ticker.as_str());
        Ok(MessageResponse::default())
    }

    async fn analyze_stock(&self, ticker: &Ticker) -> Result<StockAnalysis, ApiError> {
        self.hit("analyze");
        if self.broken_tickers.iter().any(|t| t == ticker.as_str()) {
            return Err(ApiError::Backend {
                status: 200,
                message: "Invalid ticker or no data available.".to_string(),
            });
        }
        Ok(StockAnalysis {
            ticker: ticker.to_string(),
            last_close_price: 100.0,
            historical_volatility: Some(0.18),
            sharpe_ratio: Some(1.1),
            predicted_volatility: Some(0.16),
            chart_data: ChartData {
                labels: vec!["2024-06-04".to_string(), "2024-06-05".to_string()],
                prices: vec![101.5, 100.0],
            },
            ai_summary: Some("Sideways. Low volume.".to_string()),
        })
    }

    async fn get_recommendation(&self, _query: &str) -> Result<String, ApiError> {
        self.hit("recommend");
        self.recommendation
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok("Hold".to_string()))
    }

    async fn get_ticker_data(&self) -> Result<Vec<TickerSnapshot>, ApiError> {
        Ok(Vec::new())
    }

    async fn get_risk_alerts(&self) -> Result<Vec<String>, ApiError> {
        self.hit("alerts");
        self.alerts.lock().unwrap().clone().unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        Ok(UserInfo {
            username: self.username.clone(),
        })
    }

    async fn get_index_quote(&self) -> Result<IndexQuote, ApiError> {
        Err(ApiError::Transport("unused".to_string()))
    }
}

fn backend(status: u16, message: &str) -> ApiError {
    ApiError::Backend {
        status,
        message: message.to_string(),
    }
}

// ============================================================
//  AuthForm
// ============================================================

#[tokio::test]
async fn test_auth_form_messages() {
    let ok = Arc::new(MockApi::default());
    let mut form = AuthForm::new(ok.clone());
    assert_eq!(form.login("", "pw").await, Err(MISSING_FIELDS.to_string()));
    assert_eq!(ok.count("login"), 0);

    assert_eq!(form.login("amy", "pw").await, Ok(()));
    assert!(!form.is_loading());
    assert_eq!(
        form.register("amy", "pw").await,
        Ok("User created successfully. Redirecting to login...".to_string())
    );

    let rejected = Arc::new(MockApi {
        login_error: Some(backend(401, "Invalid credentials")),
        register_error: Some(backend(409, "Username already exists")),
        ..MockApi::default()
    });
    let mut form = AuthForm::new(rejected);
    assert_eq!(form.login("amy", "x").await, Err("Invalid credentials".to_string()));
    assert_eq!(
        form.register("amy", "x").await,
        Err("Username already exists".to_string())
    );

    let offline = Arc::new(MockApi {
        login_error: Some(ApiError::Transport("refused".to_string())),
        register_error: Some(ApiError::Transport("refused".to_string())),
        ..MockApi::default()
    });
    let mut form = AuthForm::new(offline);
    assert_eq!(form.login("amy", "x").await, Err(LOGIN_FAILED.to_string()));
    assert_eq!(form.register("amy", "x").await, Err(REGISTER_FAILED.to_string()));
}

// ============================================================
//  WatchlistView
// ============================================================

#[tokio::test]
async fn test_refresh_drops_failed_analyses_in_order() {
    let api = Arc::new(MockApi {
        watchlist: Mutex::new(vec![
            "TCS.NS".to_string(),
            "BAD".to_string(),
            "INFY.NS".to_string(),
            "^NSEI".to_string(),
        ]),
        broken_tickers: vec!["BAD".to_string()],
        ..MockApi::default()
    });
    let mut view = WatchlistView::new(api.clone());

    view.refresh().await.unwrap();
    let tickers: Vec<&str> = view.rows().iter().map(|r| r.ticker()).collect();
    assert_eq!(tickers, vec!["TCS.NS", "INFY.NS", "^NSEI"]);
    assert_eq!(api.count("analyze"), 4);
    assert!(!view.is_loading());

    let row = &view.rows()[0];
    assert!(row.is_negative());
    assert_eq!(row.change_text(), "-1.50");
    assert_eq!(row.headline(), "Sideways");
}

#[tokio::test]
async fn test_refresh_error_keeps_rows() {
    let api = Arc::new(MockApi {
        watchlist_error: Some(backend(500, "db down")),
        ..MockApi::default()
    });
    let mut view = WatchlistView::new(api);

    let err = view.refresh().await.unwrap_err();
    assert_eq!(err, "Failed to load watchlist: db down");
    assert_eq!(view.error(), Some("Failed to load watchlist: db down"));
    assert!(view.is_empty());
}

#[tokio::test]
async fn test_add_and_remove() {
    let api = Arc::new(MockApi::default());
    let mut view = WatchlistView::new(api.clone());

    view.add("   ").await.unwrap();
    assert_eq!(api.count("add"), 0);

    view.add(" wipro.ns ").await.unwrap();
    assert_eq!(view.rows().len(), 1);
    assert_eq!(view.rows()[0].ticker(), "WIPRO.NS");

    let err = view.add("WIPRO.NS").await.unwrap_err();
    assert_eq!(err, "Failed to add WIPRO.NS: Stock already in watchlist");

    let err = view.add("two words").await.unwrap_err();
    assert!(err.starts_with("Failed to add TWO WORDS"));

    view.remove("wipro.ns").await.unwrap();
    assert!(view.is_empty());
    assert_eq!(api.count("remove"), 1);
}

// ============================================================
//  AdvisorChat
// ============================================================

#[tokio::test]
async fn test_advisor_transcript() {
    let api = Arc::new(MockApi::default());
    let mut chat = AdvisorChat::new(api.clone());
    assert_eq!(chat.messages().len(), 1);
    assert_eq!(chat.messages()[0].text, GREETING);

    assert!(chat.ask("  ").await.is_none());
    assert_eq!(api.count("recommend"), 0);

    let reply = chat.ask("Should I buy TCS?").await.unwrap();
    assert_eq!(reply.sender, Sender::Bot);
    assert_eq!(reply.text, "Hold");
    assert_eq!(reply.time.len(), 5);
    assert_eq!(&reply.time[2..3], ":");

    let user = &chat.messages()[1];
    assert_eq!(user.sender, Sender::User);
    assert_eq!(user.text, "Should I buy TCS?");
    assert!(!chat.is_loading());
}

#[tokio::test]
async fn test_advisor_error_texts() {
    let api = Arc::new(MockApi::default());
    let mut chat = AdvisorChat::new(api.clone());

    let cases = [
        (Ok(String::new()), NO_ANSWER),
        (
            Err(ApiError::Unauthorized {
                status: 401,
                message: "Missing Authorization Header".to_string(),
            }),
            SESSION_EXPIRED_MESSAGE,
        ),
        (
            Err(ApiError::Unauthorized {
                status: 422,
                message: "Not enough segments".to_string(),
            }),
            SESSION_EXPIRED_MESSAGE,
        ),
        (Err(backend(500, "boom")), SERVICE_ERROR),
        (Err(ApiError::Transport("refused".to_string())), SERVICE_ERROR),
    ];

    for (outcome, expected) in cases {
        *api.recommendation.lock().unwrap() = Some(outcome);
        let reply = chat.ask("anything").await.unwrap();
        assert_eq!(reply.text, expected);
        assert!(!chat.is_loading());
    }
    assert_eq!(chat.messages().len(), 1 + 2 * 5);
}

// ============================================================
//  HeaderState
// ============================================================

#[tokio::test]
async fn test_header_alerts_and_user() {
    let api = Arc::new(MockApi {
        username: "neha".to_string(),
        ..MockApi::default()
    });
    let mut header = HeaderState::new(api.clone());
    assert_eq!(header.display_name(), "Guest User");

    header.load_user().await;
    assert_eq!(header.username(), Some("neha"));

    *api.alerts.lock().unwrap() = Some(Ok(vec!["High volatility in TCS.NS".to_string()]));
    header.poll_alerts().await;
    assert!(header.has_unread());
    assert_eq!(header.alerts().len(), 1);

    header.open_alerts();
    assert!(!header.has_unread());

    // 拉取失败时保留旧告警
    header.refresh_alerts(Err(ApiError::Transport("refused".to_string())));
    assert_eq!(header.alerts().len(), 1);

    header.refresh_alerts(Ok(Vec::new()));
    assert!(header.alerts().is_empty());
    assert!(!header.has_unread());

    header.logout().await.unwrap();
    assert_eq!(api.count("logout"), 1);
    assert!(header.username().is_none());
}

#[tokio::test]
async fn test_header_ignores_blank_username() {
    let api = Arc::new(MockApi::default());
    let mut header = HeaderState::new(api);
    header.load_user().await;
    assert!(header.username().is_none());
}
