use crate::cli::{Command, USAGE};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tradeai_client::poll::Poller;
use tradeai_core::api::entity::StockAnalysis;
use tradeai_core::api::error::ApiError;
use tradeai_core::api::port::DashboardApi;
use tradeai_core::common::Ticker;
use tradeai_core::config::PollingConfig;
use tradeai_dashboard::advisor::AdvisorChat;
use tradeai_dashboard::auth::AuthForm;
use tradeai_dashboard::chart::IndexChart;
use tradeai_dashboard::header::HeaderState;
use tradeai_dashboard::portfolio::{Portfolio, round2};
use tradeai_dashboard::ticker::TickerTape;
use tradeai_dashboard::watchlist::WatchlistView;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// # Summary
/// 执行一个子命令。
///
/// # Logic
/// 失败时返回错误，由 `main` 打印到 stderr 并以非零状态码退出。
pub async fn run(command: Command, api: Arc<dyn DashboardApi>, polling: &PollingConfig) -> CommandResult {
    match command {
        Command::Help => println!("{}", USAGE),
        Command::Register { username, password } => {
            let message = AuthForm::new(api).register(&username, &password).await?;
            println!("{}", message);
        }
        Command::Login { username, password } => {
            AuthForm::new(api).login(&username, &password).await?;
            println!("Logged in as {}", username.trim());
        }
        Command::Logout => {
            api.logout().await?;
            println!("Logged out");
        }
        Command::WhoAmI => {
            let mut header = HeaderState::new(api.clone());
            header.load_user().await;
            let authenticated = api.is_authenticated().await?;
            match header.username() {
                Some(name) => println!("{}", name),
                None if authenticated => println!("Session stored but user unknown"),
                None => println!("Not logged in"),
            }
        }
        Command::Watchlist => {
            let mut view = WatchlistView::new(api);
            view.refresh().await?;
            print_watchlist(&view);
        }
        Command::Watch(raw) => {
            let mut view = WatchlistView::new(api);
            view.add(&raw).await?;
            print_watchlist(&view);
        }
        Command::Unwatch(raw) => {
            let mut view = WatchlistView::new(api);
            view.remove(&raw).await?;
            print_watchlist(&view);
        }
        Command::Analyze(raw) => {
            let ticker = Ticker::parse(&raw).map_err(ApiError::from)?;
            let analysis = api.analyze_stock(&ticker).await?;
            println!(
                "{}  {:.2}  {:+.2}",
                analysis.ticker,
                analysis.last_close_price,
                analysis.price_change()
            );
            println!("{}", risk_line(&analysis));
            if let Some(summary) = analysis.ai_summary.as_deref() {
                println!("{}", summary);
            }
        }
        Command::Ask(query) => {
            let mut chat = AdvisorChat::new(api);
            if let Some(reply) = chat.ask(&query).await {
                println!("[{}] {}", reply.time, reply.text);
            }
        }
        Command::Alerts => {
            let alerts = api.get_risk_alerts().await?;
            if alerts.is_empty() {
                println!("No alerts");
            }
            for alert in alerts {
                println!("! {}", alert);
            }
        }
        Command::Tape => {
            let mut tape = TickerTape::new();
            tape.apply(api.get_ticker_data().await);
            println!("{}", tape.status_line());
        }
        Command::Portfolio => print_portfolio(&Portfolio::sample()),
        Command::Dashboard => dashboard(api, polling).await?,
    }
    Ok(())
}

// 风险指标缺失时显示 "--"
fn risk_line(analysis: &StockAnalysis) -> String {
    let fmt = |value: Option<f64>, digits: usize| match value {
        Some(v) => format!("{:.*}", digits, v),
        None => "--".to_string(),
    };
    format!(
        "hist vol {}  sharpe {}  predicted vol {}",
        fmt(analysis.historical_volatility, 3),
        fmt(analysis.sharpe_ratio, 2),
        fmt(analysis.predicted_volatility, 3)
    )
}

fn print_watchlist(view: &WatchlistView) {
    if view.is_empty() {
        println!("Your watchlist is empty.");
        return;
    }
    for row in view.rows() {
        println!(
            "{:<12} {:>10.2} {:>8}  {}",
            row.ticker(),
            row.last_close(),
            row.change_text(),
            row.headline()
        );
    }
}

fn print_portfolio(portfolio: &Portfolio) {
    for h in portfolio.holdings() {
        let percent = h
            .gain_percent()
            .map(|p| format!("{}%", round2(p)))
            .unwrap_or_else(|| "--".to_string());
        println!(
            "{:<6} {:<20} {:>5} {:>10} {:>10} {:>10} {:>8}",
            h.symbol,
            h.name,
            h.shares,
            round2(h.avg_price),
            round2(h.value()),
            round2(h.gain()),
            percent
        );
    }
    println!(
        "Total value {}  cost {}  gain {}",
        round2(portfolio.total_value()),
        round2(portfolio.total_cost()),
        round2(portfolio.total_gain())
    );
}

/// # Summary
/// 看板主循环。
///
/// # Logic
/// 1. 加载用户名，启动行情条、风险告警、指数三个轮询器。
/// 2. 每个轮询结果应用到对应视图并输出一行状态。
/// 3. 收到 Ctrl-C 后退出，句柄析构时终止全部轮询任务。
async fn dashboard(api: Arc<dyn DashboardApi>, polling: &PollingConfig) -> CommandResult {
    let mut header = HeaderState::new(api.clone());
    header.load_user().await;
    info!("Dashboard started for {}", header.display_name());

    let mut tape = TickerTape::new();
    let mut chart = IndexChart::new();

    let tape_api = api.clone();
    let (_tape_handle, mut tape_stream) =
        Poller::spawn("ticker-tape", Duration::from_secs(polling.ticker_secs), move || {
            let api = tape_api.clone();
            async move { api.get_ticker_data().await }
        });

    let alerts_api = api.clone();
    let (_alerts_handle, mut alerts_stream) =
        Poller::spawn("risk-alerts", Duration::from_secs(polling.alerts_secs), move || {
            let api = alerts_api.clone();
            async move { api.get_risk_alerts().await }
        });

    let index_api = api.clone();
    let (_index_handle, mut index_stream) =
        Poller::spawn("index-quote", Duration::from_secs(polling.index_secs), move || {
            let api = index_api.clone();
            async move { api.get_index_quote().await }
        });

    loop {
        tokio::select! {
            Some(result) = tape_stream.next() => {
                tape.apply(result);
                info!("Tape: {}", tape.status_line());
            }
            Some(result) = alerts_stream.next() => {
                header.refresh_alerts(result);
                if header.has_unread() {
                    for alert in header.alerts() {
                        warn!("Risk alert: {}", alert);
                    }
                    header.open_alerts();
                }
            }
            Some(result) = index_stream.next() => match result {
                Ok(quote) => {
                    chart.push(quote.price);
                    info!(
                        price = quote.price,
                        high = quote.high,
                        low = quote.low,
                        volume = quote.volume,
                        "Index: {:?}",
                        chart.series()
                    );
                }
                Err(e) => warn!("Error fetching index data: {}", e),
            },
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Shutdown signal received. Exiting...");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradeai_core::api::entity::ChartData;

    fn analysis() -> StockAnalysis {
        StockAnalysis {
            ticker: "TCS.NS".to_string(),
            last_close_price: 3900.0,
            historical_volatility: Some(0.2314),
            sharpe_ratio: Some(1.374),
            predicted_volatility: None,
            chart_data: ChartData::default(),
            ai_summary: None,
        }
    }

    #[test]
    fn test_risk_line() {
        assert_eq!(
            risk_line(&analysis()),
            "hist vol 0.231  sharpe 1.37  predicted vol --"
        );
    }
}
