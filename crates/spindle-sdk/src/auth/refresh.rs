//! Single-flight token refresh
//!
//! The coordinator owns the one in-flight refresh operation for a client.
//! The first authorization failure installs a shared future while holding
//! the coordinator lock; every concurrent failure joins that future
//! instead of issuing its own refresh call, so N simultaneous 401s
//! produce exactly one network call and all N callers settle on the same
//! token (or the same failure). The slot is reset when the operation
//! settles, whatever the outcome.

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::auth::session::SessionState;
use crate::auth::storage::TokenPair;
use crate::client::{ApiRequest, ClientInner, REFRESH_PATH};
use crate::error::ApiError;
use crate::types::{AuthTokens, Envelope, RefreshRequest};

/// Failure of a refresh attempt.
///
/// Clone is required so one outcome can fan out to every caller awaiting
/// the shared handle.
#[derive(Debug, Clone, Error)]
pub enum RefreshError {
    /// No refresh token stored; refused without a network call
    #[error("no refresh token available")]
    MissingRefreshToken,

    /// The server rejected the refresh token
    #[error("refresh rejected: {message}")]
    Rejected { message: String },

    /// Transport failure while calling the refresh endpoint
    #[error("refresh transport failure: {message}")]
    Network { message: String },

    /// The refresh response did not contain a usable token pair
    #[error("malformed refresh response: {message}")]
    MalformedResponse { message: String },

    /// The new pair could not be persisted
    #[error("token storage failure: {message}")]
    Storage { message: String },
}

impl From<RefreshError> for ApiError {
    fn from(e: RefreshError) -> Self {
        ApiError::SessionExpired {
            message: e.to_string(),
        }
    }
}

type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

/// At-most-one-in-flight refresh state, one per client instance
pub(crate) struct RefreshCoordinator {
    inflight: Mutex<Option<SharedRefresh>>,
}

impl RefreshCoordinator {
    pub(crate) fn new() -> Self {
        Self {
            inflight: Mutex::new(None),
        }
    }

    /// Acquire a fresh access token, reusing an in-flight refresh if one
    /// exists.
    ///
    /// Installation of the handle happens under the lock, before the
    /// refresh itself is awaited, so two failures observed back-to-back
    /// cannot both conclude "no refresh running" and start one each.
    pub(crate) async fn acquire(&self, client: Arc<ClientInner>) -> Result<String, RefreshError> {
        let shared = {
            let mut slot = self.inflight.lock().await;
            match slot.as_ref() {
                Some(inflight) => {
                    debug!("joining in-flight token refresh");
                    inflight.clone()
                }
                None => {
                    debug!("starting token refresh");
                    let fut = Self::start(client).boxed().shared();
                    *slot = Some(fut.clone());
                    fut
                }
            }
        };
        shared.await
    }

    /// Run one refresh to completion and reset the slot afterwards
    async fn start(client: Arc<ClientInner>) -> Result<String, RefreshError> {
        let result = Self::run(&client).await;
        if let Err(e) = &result {
            warn!("token refresh failed: {e}");
            if let Err(clear) = client.tokens.clear_pair().await {
                warn!("failed to clear tokens after refresh failure: {clear}");
            }
            client.session.publish(SessionState::SignedOut);
        }
        client.refresh.inflight.lock().await.take();
        result
    }

    async fn run(client: &Arc<ClientInner>) -> Result<String, RefreshError> {
        let refresh = client
            .tokens
            .refresh_token()
            .await
            .ok_or(RefreshError::MissingRefreshToken)?;

        // The refresh call goes out on the non-recovering path; a 401
        // there is terminal, never a refresh-of-a-refresh.
        let body = serde_json::to_value(RefreshRequest { refresh })
            .map_err(|e| RefreshError::MalformedResponse {
                message: e.to_string(),
            })?;
        let request = ApiRequest::post(REFRESH_PATH, body);

        let response = client
            .execute_terminal(&request)
            .await
            .map_err(|e| match e {
                ApiError::HttpClient(inner) => RefreshError::Network {
                    message: inner.to_string(),
                },
                ApiError::Authentication { message }
                | ApiError::SessionExpired { message } => RefreshError::Rejected { message },
                other => RefreshError::Rejected {
                    message: other.to_string(),
                },
            })?;

        let payload: Envelope<AuthTokens> =
            response
                .json()
                .await
                .map_err(|e| RefreshError::MalformedResponse {
                    message: e.to_string(),
                })?;

        let pair = TokenPair {
            access_token: payload.data.access_token,
            refresh_token: payload.data.refresh_token,
        };
        client
            .tokens
            .store_pair(&pair)
            .await
            .map_err(|e| RefreshError::Storage {
                message: e.to_string(),
            })?;
        client.session.publish(SessionState::Authenticated);
        info!("access token refreshed");

        Ok(pair.access_token)
    }
}
