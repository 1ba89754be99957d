use std::sync::{Arc, Weak};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::api::backend::{
    AdminBackend, CURRENT_USER_ENDPOINT, LOGIN_ENDPOINT, LOGOUT_ENDPOINT, MODULES_ENDPOINT,
};
use crate::auth::{Credentials, LoginResponse, Module, UserDto};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::session::storage::TokenStore;

/// Reaction to a 401 from any call made through the shared client
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self);
}

/// Accepts both `{"success": true, "data": T}` and a bare `T`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

/// Shared HTTP client for the admin backend.
///
/// Attaches `Authorization: Bearer <token>` from the token store on every
/// request and reports 401s to the registered handler.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
    unauthorized: OnceCell<Weak<dyn UnauthorizedHandler>>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        // Validate once so request building only has to join paths
        Url::parse(base_url)?;

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            unauthorized: OnceCell::new(),
        })
    }

    pub fn from_config(config: &AppConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(&config.api.base_url, config.api.request_timeout(), tokens)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Register the global 401 reaction. Only the first registration sticks.
    pub fn set_unauthorized_handler(&self, handler: Weak<dyn UnauthorizedHandler>) -> bool {
        self.unauthorized.set(handler).is_ok()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::GET, path, None).await?;
        decode(&body)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, payload: &B) -> Result<T, ApiError> {
        let payload = serde_json::to_value(payload)?;
        let body = self.execute(Method::POST, path, Some(payload)).await?;
        decode(&body)
    }

    /// POST without a body, ignoring whatever the backend answers on success
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::POST, path, None).await.map(|_| ())
    }

    fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}/{}", self.base_url, path.trim_start_matches('/')))?)
    }

    async fn execute(&self, method: Method, path: &str, payload: Option<Value>) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path)?;

        let token = self.tokens.load().unwrap_or_else(|e| {
            tracing::warn!("Failed to read stored token: {}", e);
            None
        });

        let mut request = self.http.request(method.clone(), url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok(body);
        }

        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        let err = ApiError::from_status(status.as_u16(), message);

        tracing::debug!(%method, path, status = status.as_u16(), "backend call failed");

        if err.is_unauthorized() && triggers_forced_logout(path) {
            self.notify_unauthorized(path);
        }

        Err(err)
    }

    fn notify_unauthorized(&self, path: &str) {
        match self.unauthorized.get().and_then(Weak::upgrade) {
            Some(handler) => {
                tracing::info!(path, "401 from backend, forcing logout");
                handler.on_unauthorized();
            }
            None => tracing::debug!(path, "401 from backend with no handler registered"),
        }
    }
}

/// Login and logout answer 401 on their own terms; every other 401 means the
/// session is gone.
fn triggers_forced_logout(path: &str) -> bool {
    let path = format!("/{}", path.trim_start_matches('/'));
    path != LOGIN_ENDPOINT && path != LOGOUT_ENDPOINT
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.into_inner())
}

/// Pull `message` or `error` out of an error body
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|field| value.get(*field).and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl AdminBackend for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post(LOGIN_ENDPOINT, credentials).await
    }

    async fn current_user(&self) -> Result<UserDto, ApiError> {
        self.get(CURRENT_USER_ENDPOINT).await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.post_empty(LOGOUT_ENDPOINT).await
    }

    async fn list_modules(&self) -> Result<Vec<Module>, ApiError> {
        self.get(MODULES_ENDPOINT).await
    }
}
