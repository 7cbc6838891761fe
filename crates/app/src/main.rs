mod cli;
mod commands;
mod logging;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tradeai_client::http::HttpDashboardClient;
use tradeai_client::session::SessionSlot;
use tradeai_core::api::port::DashboardApi;
use tradeai_store::sqlite::SqliteKvStore;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
///
/// # Logic
/// 1. 解析命令行，加载配置，初始化日志。
/// 2. 打开本地会话库，迁移旧版凭证键。
/// 3. 构造 HTTP 客户端并以 `Arc<dyn DashboardApi>` 注入视图。
/// 4. 执行子命令（默认进入看板轮询，直到 Ctrl-C）。
#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let command = match cli::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("{}\n\n{}", message, cli::USAGE);
            return Ok(ExitCode::from(2));
        }
    };

    // 1. 配置与日志
    let config = settings::load()?;
    let _guard = logging::init(&config)?;
    info!(base_url = %config.backend.base_url, "tradeAI client starting...");

    // 2. 会话存储
    let store = Arc::new(SqliteKvStore::open(&config.storage.data_dir).await?);
    let session = SessionSlot::new(store);
    if session.migrate_legacy().await? {
        info!("Adopted credential from legacy session key");
    }

    // 3. 后端客户端
    let api: Arc<dyn DashboardApi> =
        Arc::new(HttpDashboardClient::new(&config.backend.base_url, session)?);

    // 4. 执行命令
    if let Err(e) = commands::run(command, api, &config.polling).await {
        error!("Command failed: {}", e);
        eprintln!("{}", e);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
