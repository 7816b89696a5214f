use crate::auth;
use crate::domain::entities::diary_asset::{DiaryAsset, NewDiaryAsset};
use crate::domain::entities::market_asset::MarketAsset;
use crate::domain::entities::session::{
    Credentials, FieldErrors, LoginOutcome, RegistrationOutcome,
};
use crate::domain::entities::trading_log::{NewTradingLog, TradingLog};
use crate::domain::errors::ApiError;
use crate::domain::repositories::journal_backend::{BackendResult, JournalBackend};
use crate::domain::repositories::token_store::TokenStore;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Body of `POST /users/login`: either a token or an error code.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    error: Option<String>,
}

/// HTTP client for the journal backend.
///
/// Every call carries `Content-Type: application/json` and, when the token
/// store holds a session token, `Authorization: Bearer <token>`.
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            client: Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `path` is appended verbatim, so it must start with `/`.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request and hand back the raw response.
    ///
    /// Status codes are not inspected here. Transport failures are returned
    /// as `ApiError::Transport`.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> Result<Response, ApiError> {
        let url = self.url_for(path);
        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = self.tokens.load() {
            request = request.header(AUTHORIZATION, auth::bearer_header(&token));
        }

        if let Some(body) = body {
            let payload =
                serde_json::to_vec(&body).map_err(|e| ApiError::Encode(e.to_string()))?;
            request = request.body(payload);
        }

        debug!("{} {}", method, url);
        request.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, url, e);
            ApiError::from(e)
        })
    }

    async fn call_json<T: DeserializeOwned>(
        &self,
        path: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> BackendResult<T> {
        let response = self.call(path, method, body).await?;
        let response = ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn call_unit(
        &self,
        path: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> BackendResult<()> {
        let response = self.call(path, method, body).await?;
        ensure_success(response).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    warn!("Backend answered {}: {}", status, body);
    Err(ApiError::UnexpectedStatus {
        status: status.as_u16(),
        body,
    })
}

fn encode<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Encode(e.to_string()))
}

#[async_trait]
impl JournalBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> BackendResult<LoginOutcome> {
        let response = self
            .call("/users/login", Method::POST, Some(encode(credentials)?))
            .await?;

        // Rejections come back as `{"error": ...}` whatever the status code
        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(match body.token {
            Some(token) if !token.is_empty() => LoginOutcome::Authenticated { token },
            _ => LoginOutcome::Rejected { error: body.error },
        })
    }

    async fn register(&self, credentials: &Credentials) -> BackendResult<RegistrationOutcome> {
        let body = json!({ "user": encode(credentials)? });
        let response = self.call("/users.json", Method::POST, Some(body)).await?;

        let status = response.status();
        if status.is_success() {
            return Ok(RegistrationOutcome::Created);
        }

        let text = response.text().await.unwrap_or_default();
        let errors = serde_json::from_str::<FieldErrors>(&text).unwrap_or_else(|_| {
            debug!("Registration rejection is not a field error map: {}", text);
            FieldErrors::new()
        });
        Ok(RegistrationOutcome::Rejected {
            status: status.as_u16(),
            errors,
        })
    }

    async fn list_trading_logs(&self) -> BackendResult<Vec<TradingLog>> {
        self.call_json("/diaries.json", Method::GET, None).await
    }

    async fn create_trading_log(&self, trading_log: &NewTradingLog) -> BackendResult<TradingLog> {
        let body = json!({ "diary": encode(trading_log)? });
        self.call_json("/diaries.json", Method::POST, Some(body))
            .await
    }

    async fn delete_trading_log(&self, id: i64) -> BackendResult<()> {
        self.call_unit(&format!("/diaries/{}.json", id), Method::DELETE, None)
            .await
    }

    async fn list_diary_assets(&self, diary_id: i64) -> BackendResult<Vec<DiaryAsset>> {
        self.call_json(&format!("/diaries/{}/assets.json", diary_id), Method::GET, None)
            .await
    }

    async fn attach_asset(&self, asset: &NewDiaryAsset) -> BackendResult<()> {
        let body = json!({ "diary_asset": encode(asset)? });
        self.call_unit("/diary_assets.json", Method::POST, Some(body))
            .await
    }

    async fn detach_asset(&self, id: i64) -> BackendResult<()> {
        self.call_unit(&format!("/diary_assets/{}.json", id), Method::DELETE, None)
            .await
    }

    async fn list_market_assets(&self) -> BackendResult<Vec<MarketAsset>> {
        self.call_json("/assets.json", Method::GET, None).await
    }
}
