use serde::{Deserialize, Serialize};

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,
    pub storage: StorageConfig,
    pub polling: PollingConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    // 后端 API 根地址，所有接口路径均相对于此地址
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    // 本地会话库与日志文件所在目录
    pub data_dir: String,
}

/// 各看板组件的轮询周期（秒）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub ticker_secs: u64,
    pub alerts_secs: u64,
    pub index_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    // tracing EnvFilter 语法，例如 "info" 或 "tradeai_client=debug"
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig {
                base_url: "http://127.0.0.1:5000/api".to_string(),
            },
            storage: StorageConfig {
                data_dir: "data".to_string(),
            },
            polling: PollingConfig {
                ticker_secs: 30,
                alerts_secs: 60,
                index_secs: 5,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// # Summary
    /// 校验配置的合法性。
    ///
    /// # Logic
    /// 1. `base_url` 必须以 http:// 或 https:// 开头且不为空主机。
    /// 2. 所有轮询周期必须大于 0。
    ///
    /// # Returns
    /// 合法返回 Ok，否则返回错误描述。
    pub fn validate(&self) -> Result<(), String> {
        let url = self.backend.base_url.trim();
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"))
            .ok_or_else(|| format!("backend.base_url must be http(s): {}", url))?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(format!("backend.base_url has no host: {}", url));
        }

        let polling = &self.polling;
        if polling.ticker_secs == 0 || polling.alerts_secs == 0 || polling.index_secs == 0 {
            return Err("polling intervals must be greater than zero".to_string());
        }
        Ok(())
    }
}
