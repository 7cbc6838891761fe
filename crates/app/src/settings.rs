use config::{Config, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tradeai_core::config::AppConfig;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "tradeai.toml";

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "TRADEAI_CONFIG";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 为底。
/// 2. 叠加可选的 TOML 文件（`TRADEAI_CONFIG` 或当前目录下的 `tradeai.toml`）。
/// 3. 叠加 `TRADEAI__SECTION__KEY` 形式的环境变量。
/// 4. 校验最终结果。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    load_from(&path, true)
}

/// # Summary
/// 从指定文件加载配置。
///
/// # Arguments
/// * `path`: 配置文件路径，不存在时跳过。
/// * `with_env`: 是否叠加环境变量。
pub fn load_from(path: &Path, with_env: bool) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(path).required(false));

    if with_env {
        builder = builder.add_source(
            Environment::with_prefix("TRADEAI")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
    }

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate().map_err(ConfigError::Message)?;
    Ok(config)
}
