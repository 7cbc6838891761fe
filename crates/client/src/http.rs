use crate::session::SessionSlot;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use tradeai_core::api::entity::{
    AnalysisPayload, AuthRequest, DataEnvelope, ErrorBody, IndexQuote, LoginResponse, MessageResponse,
    RecommendRequest, RecommendationResponse, RiskAlertsResponse, StockAnalysis, TickerRequest,
    TickerSnapshot, UserInfo, WatchlistResponse,
};
use tradeai_core::api::error::ApiError;
use tradeai_core::api::port::DashboardApi;
use tradeai_core::common::Ticker;
use tradeai_core::session::Credential;

/// 请求是否需要附带会话凭证
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Protected,
}

/// # Summary
/// 基于 `reqwest` 的看板后端客户端。
///
/// # Invariants
/// - 所有请求共用同一个 `Client`（连接池复用）。
/// - 受保护请求在发送前才从 `SessionSlot` 读取凭证。
/// - 不设置超时，不重试。
#[derive(Clone)]
pub struct HttpDashboardClient {
    client: Client,
    base_url: Url,
    session: SessionSlot,
}

impl HttpDashboardClient {
    /// # Summary
    /// 创建客户端。
    ///
    /// # Logic
    /// 1. 安装 rustls 的 ring 加密实现（进程内只会成功一次）。
    /// 2. 解析并校验后端根地址。
    /// 3. 构建 reqwest 客户端。
    ///
    /// # Arguments
    /// * `base_url`: 后端 API 根地址，例如 `http://127.0.0.1:5000/api`。
    /// * `session`: 会话凭证槽。
    ///
    /// # Returns
    /// 成功返回客户端，地址非法返回 `ApiError::InvalidInput`。
    pub fn new(base_url: &str, session: SessionSlot) -> Result<Self, ApiError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidInput(format!("base url {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidInput(format!(
                "base url {} cannot carry a path",
                base_url
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &SessionSlot {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// # Summary
    /// 在根地址后追加路径段。
    ///
    /// # Logic
    /// 每个段独立进行百分号编码，`/`、`?`、`#` 等字符无法逃逸出所在段。
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidInput(format!("base url {} cannot carry a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        Ok(self.client.request(method, self.endpoint(segments)?))
    }

    /// # Summary
    /// 发送请求并解码响应。
    ///
    /// # Logic
    /// 1. 受保护请求读取当前凭证，存在则附加 `Authorization: Bearer`，否则不附加任何头。
    /// 2. 发送请求，网络错误映射为 `Transport`。
    /// 3. 交由 `decode` 处理状态码与响应体。
    async fn dispatch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        access: Access,
    ) -> Result<T, ApiError> {
        let (request, authorized) = match access {
            Access::Public => (request, false),
            Access::Protected => match self.session.current().await? {
                Some(credential) => (request.bearer_auth(credential.expose()), true),
                None => (request, false),
            },
        };

        let request = request
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(
            method = %request.method(),
            path = request.url().path(),
            authorized,
            "Dispatching request"
        );

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Self::decode(response, access).await
    }

    /// # Summary
    /// 将响应映射为结果或 `ApiError`。
    ///
    /// # Logic
    /// 1. 2xx：按 `T` 解码，失败为 `Parse`。
    /// 2. 受保护接口的 401/422：`Unauthorized`。
    /// 3. 响应体含结构化错误信息：`Backend`，原样透传。
    /// 4. 其余：`Transport("HTTP <status>")`。
    async fn decode<T: DeserializeOwned>(response: Response, access: Access) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parse(e.to_string()));
        }

        let code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);

        if access == Access::Protected && (code == 401 || code == 422) {
            warn!(status = code, "Credential rejected by backend");
            return Err(ApiError::Unauthorized {
                status: code,
                message: message.unwrap_or_else(|| format!("HTTP {}", code)),
            });
        }

        match message {
            Some(message) => {
                debug!(status = code, %message, "Backend returned an error");
                Err(ApiError::Backend {
                    status: code,
                    message,
                })
            }
            None => Err(ApiError::Transport(format!("HTTP {}", status))),
        }
    }
}

// 用户名与密码只做非空校验，其余规则由后端决定
fn validate_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::InvalidInput(
            "username and password must not be empty".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl DashboardApi for HttpDashboardClient {
    async fn register(&self, username: &str, password: &str) -> Result<MessageResponse, ApiError> {
        validate_credentials(username, password)?;
        let body = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: MessageResponse = self
            .dispatch(self.request(Method::POST, &["register"])?.json(&body), Access::Public)
            .await?;
        info!(username, "Registration accepted");
        Ok(response)
    }

    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        validate_credentials(username, password)?;
        let body = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .dispatch(self.request(Method::POST, &["login"])?.json(&body), Access::Public)
            .await?;

        let credential = Credential::new(response.access_token.as_str()).ok_or_else(|| {
            ApiError::Parse("login response carried an empty access_token".to_string())
        })?;
        self.session.store(&credential).await?;
        info!(username, "Login succeeded");
        Ok(response)
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.session.clear().await?;
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool, ApiError> {
        Ok(self.session.is_authenticated().await?)
    }

    async fn get_watchlist(&self) -> Result<Vec<String>, ApiError> {
        let response: WatchlistResponse = self
            .dispatch(self.request(Method::GET, &["watchlist"])?, Access::Protected)
            .await?;
        Ok(response.tickers)
    }

    async fn add_stock_to_watchlist(&self, ticker: &Ticker) -> Result<MessageResponse, ApiError> {
        let body = TickerRequest {
            ticker: ticker.to_string(),
        };
        self.dispatch(
            self.request(Method::POST, &["watchlist"])?.json(&body),
            Access::Protected,
        )
        .await
    }

    async fn remove_stock_from_watchlist(
        &self,
        ticker: &Ticker,
    ) -> Result<MessageResponse, ApiError> {
        self.dispatch(
            self.request(Method::DELETE, &["watchlist", ticker.as_str()])?,
            Access::Protected,
        )
        .await
    }

    async fn analyze_stock(&self, ticker: &Ticker) -> Result<StockAnalysis, ApiError> {
        let body = TickerRequest {
            ticker: ticker.to_string(),
        };
        let envelope: DataEnvelope<AnalysisPayload> = self
            .dispatch(self.request(Method::POST, &["analyze"])?.json(&body), Access::Public)
            .await?;
        match envelope.data {
            AnalysisPayload::Ready(analysis) => Ok(analysis),
            // 分析失败以 HTTP 200 + `{ "error": ... }` 返回
            AnalysisPayload::Failed { error } => {
                warn!(%ticker, %error, "Backend could not analyze ticker");
                Err(ApiError::Backend {
                    status: 200,
                    message: error,
                })
            }
        }
    }

    async fn get_recommendation(&self, query: &str) -> Result<String, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ApiError::InvalidInput("query must not be empty".to_string()));
        }
        let body = RecommendRequest {
            query: query.to_string(),
        };
        let response: RecommendationResponse = self
            .dispatch(
                self.request(Method::POST, &["recommend"])?.json(&body),
                Access::Protected,
            )
            .await?;
        Ok(response.into_text())
    }

    async fn get_ticker_data(&self) -> Result<Vec<TickerSnapshot>, ApiError> {
        let envelope: DataEnvelope<Vec<TickerSnapshot>> = self
            .dispatch(self.request(Method::GET, &["ticker-data"])?, Access::Public)
            .await?;
        Ok(envelope.data)
    }

    async fn get_risk_alerts(&self) -> Result<Vec<String>, ApiError> {
        let response: RiskAlertsResponse = self
            .dispatch(self.request(Method::GET, &["risk-alerts"])?, Access::Protected)
            .await?;
        Ok(response.alerts)
    }

    async fn get_user_info(&self) -> Result<UserInfo, ApiError> {
        self.dispatch(self.request(Method::GET, &["user-info"])?, Access::Protected)
            .await
    }

    async fn get_index_quote(&self) -> Result<IndexQuote, ApiError> {
        self.dispatch(self.request(Method::GET, &["stock-data"])?, Access::Public)
            .await
    }
}
