//! HTTP client for the Spindle LP catalog API
//!
//! Every outgoing request flows through the same pipeline: a bearer token
//! is attached if one is stored, and an authorization failure is recovered
//! transparently exactly once by refreshing the token pair and replaying
//! the request. Callers never manage tokens themselves.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::auth::refresh::RefreshCoordinator;
use crate::auth::session::{SessionHandle, SessionState};
use crate::auth::storage::{TokenPair, TokenStorage, TokenStore};
use crate::error::{ApiError, ErrorResponse, Result};
use crate::types::{AuthTokens, Envelope, Lp, LpPage, PageQuery, SigninRequest, SignupRequest};

/// Token refresh endpoint. The response guard matches this path exactly to
/// keep the refresh call out of its own recovery logic.
pub(crate) const REFRESH_PATH: &str = "/v1/auth/refresh";

const SIGNIN_PATH: &str = "/v1/auth/signin";
const SIGNUP_PATH: &str = "/v1/auth/signup";
const SIGNOUT_PATH: &str = "/v1/auth/signout";
const LPS_PATH: &str = "/v1/lps";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// One pending request.
///
/// Replay state is carried by copying the descriptor with the retry flag
/// set rather than mutating a shared one, so concurrent tasks never alias
/// each other's retry decisions.
#[derive(Debug, Clone)]
pub(crate) struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    retried: bool,
}

impl ApiRequest {
    pub(crate) fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
            retried: false,
        }
    }

    pub(crate) fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            retried: false,
        }
    }

    fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    fn into_retry(mut self) -> Self {
        self.retried = true;
        self
    }

    /// Hard identity check for the refresh call, not a heuristic
    fn is_refresh(&self) -> bool {
        self.method == Method::POST && self.path == REFRESH_PATH
    }
}

/// Shared client state; the refresh coordinator lives here so independent
/// client instances never share in-flight refresh state
pub(crate) struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    pub(crate) tokens: TokenStore,
    pub(crate) session: SessionHandle,
    pub(crate) refresh: RefreshCoordinator,
}

impl ClientInner {
    /// Attach a credential and transmit, without any recovery.
    ///
    /// `token_override` carries the freshly refreshed token on replay;
    /// otherwise the stored access token is attached if present. Absence
    /// of a token is the valid unauthenticated state.
    async fn send(&self, request: &ApiRequest, token_override: Option<&str>) -> Result<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self.http.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let token = match token_override {
            Some(t) => Some(t.to_string()),
            None => self.tokens.access_token().await,
        };
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        builder.send().await.map_err(ApiError::HttpClient)
    }

    /// Full pipeline: send, then apply the response guard.
    ///
    /// Per request: `SENT -> (SUCCESS | AUTH_FAILED)`; a first 401 goes
    /// through refresh-and-replay once; a 401 on a replayed request is
    /// terminal. The refresh call itself never enters this path, it goes
    /// through [`execute_terminal`](Self::execute_terminal).
    pub(crate) async fn execute(self: Arc<Self>, request: ApiRequest) -> Result<Response> {
        let response = self.send(&request, None).await?;

        // Non-auth failures and already-replayed requests propagate as-is
        if response.status() != StatusCode::UNAUTHORIZED || request.retried {
            return Self::check(response).await;
        }

        debug!(path = %request.path, "authorization failure, refreshing token");
        let retried = request.into_retry();
        let token = self.refresh.acquire(Arc::clone(&self)).await?;

        // Replay exactly once with the fresh credential; its outcome is
        // the caller's final result
        let response = self.send(&retried, Some(&token)).await?;
        Self::check(response).await
    }

    /// Send without the recovery guard, for the refresh call itself.
    ///
    /// The refresh descriptor is recognized by a hard identity check; a
    /// rejected refresh call clears both tokens and terminates the
    /// session instead of ever triggering a refresh of its own.
    pub(crate) async fn execute_terminal(&self, request: &ApiRequest) -> Result<Response> {
        let response = self.send(request, None).await?;

        if response.status() == StatusCode::UNAUTHORIZED && request.is_refresh() {
            warn!("refresh endpoint rejected the session, signing out");
            if let Err(e) = self.tokens.clear_pair().await {
                warn!("failed to clear tokens: {e}");
            }
            self.session.publish(SessionState::SignedOut);
            return match Self::check(response).await {
                Err(ApiError::Authentication { message }) => {
                    Err(ApiError::SessionExpired { message })
                }
                other => other,
            };
        }
        Self::check(response).await
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::error_from_response(response).await)
        }
    }

    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    status.to_string()
                } else {
                    body.clone()
                }
            });

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Authentication { message },
            StatusCode::FORBIDDEN => ApiError::Authorization { message },
            StatusCode::NOT_FOUND => ApiError::NotFound { resource: message },
            StatusCode::BAD_REQUEST => ApiError::BadRequest { message },
            StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimitExceeded,
            _ => ApiError::Internal {
                message: format!("request failed with status {status}: {message}"),
            },
        }
    }
}

/// Client for the Spindle API.
/// Clone is cheap; clones share the connection pool, token store, session
/// channel and refresh state.
#[derive(Clone)]
pub struct LpClient {
    inner: Arc<ClientInner>,
}

impl LpClient {
    pub fn builder() -> LpClientBuilder {
        LpClientBuilder::default()
    }

    /// Sign in and persist the returned token pair
    pub async fn signin(&self, request: &SigninRequest) -> Result<TokenPair> {
        let body = serde_json::to_value(request)?;
        let payload: Envelope<AuthTokens> =
            self.request_json(ApiRequest::post(SIGNIN_PATH, body)).await?;

        let pair = TokenPair {
            access_token: payload.data.access_token,
            refresh_token: payload.data.refresh_token,
        };
        self.inner
            .tokens
            .store_pair(&pair)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("failed to persist tokens: {e}"),
            })?;
        self.inner.session.publish(SessionState::Authenticated);
        Ok(pair)
    }

    /// Create an account. Does not sign in.
    pub async fn signup(&self, request: &SignupRequest) -> Result<()> {
        let body = serde_json::to_value(request)?;
        let response = Arc::clone(&self.inner)
            .execute(ApiRequest::post(SIGNUP_PATH, body))
            .await?;
        drop(response);
        Ok(())
    }

    /// Sign out. The server call is best-effort; local tokens are always
    /// cleared and the session channel always flips to signed-out.
    pub async fn signout(&self) -> Result<()> {
        let result = Arc::clone(&self.inner)
            .execute(ApiRequest::post(SIGNOUT_PATH, Value::Null))
            .await;

        if let Err(e) = self.inner.tokens.clear_pair().await {
            warn!("failed to clear tokens on signout: {e}");
        }
        self.inner.session.publish(SessionState::SignedOut);

        result.map(|_| ())
    }

    /// One page of the LP listing
    pub async fn list_lps(&self, query: &PageQuery) -> Result<LpPage> {
        let request = ApiRequest::get(LPS_PATH).with_query(query.to_params());
        let payload: Envelope<LpPage> = self.request_json(request).await?;
        Ok(payload.data)
    }

    /// A single LP by id
    pub async fn get_lp(&self, id: u64) -> Result<Lp> {
        let request = ApiRequest::get(format!("{LPS_PATH}/{id}"));
        let payload: Envelope<Lp> = self.request_json(request).await?;
        Ok(payload.data)
    }

    /// Watch session transitions (signed out on unrecoverable refresh
    /// failure or signout, authenticated on signin or refresh)
    pub fn subscribe_session(&self) -> watch::Receiver<SessionState> {
        self.inner.session.subscribe()
    }

    /// Current session state
    pub fn session_state(&self) -> SessionState {
        self.inner.session.current()
    }

    /// The token store backing this client
    pub fn token_store(&self) -> &TokenStore {
        &self.inner.tokens
    }

    async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = Arc::clone(&self.inner).execute(request).await?;
        response.json().await.map_err(ApiError::HttpClient)
    }
}

/// Builder for [`LpClient`]
#[derive(Default)]
pub struct LpClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    storage: Option<Arc<dyn TokenStorage>>,
}

impl LpClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base URL of the API server (required)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Inject the token storage backend shared with the UI layer.
    /// Defaults to an in-memory store.
    pub fn token_storage(mut self, storage: Arc<dyn TokenStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn build(self) -> Result<LpClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| ApiError::Internal {
                message: "base_url is required".to_string(),
            })?
            .trim_end_matches('/')
            .to_string();

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
        if let Some(connect_timeout) = self.connect_timeout {
            builder = builder.connect_timeout(connect_timeout);
        }
        let http = builder.build().map_err(ApiError::HttpClient)?;

        let tokens = match self.storage {
            Some(backend) => TokenStore::new(backend),
            None => TokenStore::in_memory(),
        };

        Ok(LpClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                tokens,
                session: SessionHandle::new(SessionState::SignedOut),
                refresh: RefreshCoordinator::new(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_identity_is_exact() {
        let refresh = ApiRequest::post(REFRESH_PATH, Value::Null);
        assert!(refresh.is_refresh());

        let get_same_path = ApiRequest::get(REFRESH_PATH);
        assert!(!get_same_path.is_refresh());

        let other = ApiRequest::post("/v1/auth/refresh/extra", Value::Null);
        assert!(!other.is_refresh());
    }

    #[test]
    fn test_retry_marking_copies_descriptor() {
        let request = ApiRequest::get(LPS_PATH);
        assert!(!request.retried);
        let replayed = request.clone().into_retry();
        assert!(replayed.retried);
        assert!(!request.retried);
    }

    #[test]
    fn test_builder_requires_base_url() {
        assert!(LpClientBuilder::default().build().is_err());
        assert!(LpClient::builder()
            .base_url("http://localhost:8000/")
            .build()
            .is_ok());
    }
}
