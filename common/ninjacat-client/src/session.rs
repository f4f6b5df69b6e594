//! OAuth2 session with single-flight token acquisition
//!
//! The session slot moves through `Unstarted -> InFlight -> Done | Failed`.
//! `InFlight` holds a shared future, so every caller arriving while an exchange
//! is running awaits that same exchange instead of starting another one. The
//! slot is swapped as a whole under the lock; readers never see a half-written
//! state.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::{NinjacatClient, management_headers};
use crate::credentials::Credentials;
use crate::error::{NinjacatError, Result};
use crate::response::{API_ERROR_FIELD, RawResponse};

/// Bearer token issued by the OAuth2 endpoint
///
/// Cloning is cheap; all clones share one allocation.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Arc<str>);

impl AccessToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

type ExchangeOutcome = std::result::Result<AccessToken, Arc<NinjacatError>>;
type Exchange = Shared<BoxFuture<'static, ExchangeOutcome>>;

enum AuthState {
    Unstarted,
    InFlight { attempt: u64, exchange: Exchange },
    Done(AccessToken),
    Failed(Arc<NinjacatError>),
}

struct Slot {
    state: AuthState,
    attempts: u64,
}

pub(crate) struct Session {
    http: Client,
    token_url: String,
    credentials: Credentials,
    retry_failed: bool,
    slot: Mutex<Slot>,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

impl Session {
    pub(crate) fn new(
        http: Client,
        token_url: String,
        credentials: Credentials,
        retry_failed: bool,
    ) -> Self {
        Self {
            http,
            token_url,
            credentials,
            retry_failed,
            slot: Mutex::new(Slot {
                state: AuthState::Unstarted,
                attempts: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) async fn authenticate(&self) -> Result<AccessToken> {
        let (attempt, exchange) = {
            let mut slot = self.lock();
            match &slot.state {
                AuthState::Done(token) => return Ok(token.clone()),
                AuthState::Failed(cause) if !self.retry_failed => {
                    return Err(NinjacatError::Authentication(cause.clone()));
                }
                AuthState::InFlight { attempt, exchange } => (*attempt, exchange.clone()),
                AuthState::Unstarted | AuthState::Failed(_) => {
                    slot.attempts += 1;
                    let attempt = slot.attempts;
                    debug!(attempt, url = %self.token_url, "starting token exchange");
                    let exchange = exchange_token(
                        self.http.clone(),
                        self.token_url.clone(),
                        self.credentials.clone(),
                    )
                    .boxed()
                    .shared();
                    slot.state = AuthState::InFlight {
                        attempt,
                        exchange: exchange.clone(),
                    };
                    (attempt, exchange)
                }
            }
        };

        let outcome = exchange.await;

        let mut slot = self.lock();
        if matches!(slot.state, AuthState::InFlight { attempt: current, .. } if current == attempt)
        {
            slot.state = match &outcome {
                Ok(token) => AuthState::Done(token.clone()),
                Err(cause) => {
                    warn!(attempt, error = %cause, "token exchange failed");
                    AuthState::Failed(cause.clone())
                }
            };
        }

        outcome.map_err(NinjacatError::Authentication)
    }

    /// Token of a completed exchange, without starting one
    pub(crate) fn current_token(&self) -> Option<AccessToken> {
        match &self.lock().state {
            AuthState::Done(token) => Some(token.clone()),
            _ => None,
        }
    }
}

async fn exchange_token(
    http: Client,
    token_url: String,
    credentials: Credentials,
) -> ExchangeOutcome {
    request_token(&http, &token_url, &credentials)
        .await
        .map_err(Arc::new)
}

async fn request_token(
    http: &Client,
    token_url: &str,
    credentials: &Credentials,
) -> Result<AccessToken> {
    debug!(url = %token_url, "POST oauth2 token");
    let response = http
        .post(token_url)
        .headers(management_headers(credentials)?)
        .header(CACHE_CONTROL, "no-cache")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(AUTHORIZATION, credentials.basic_authorization())
        .body("grant_type=client_credentials")
        .send()
        .await?;

    let body: Option<TokenResponse> = RawResponse::read(response).await?.decode(API_ERROR_FIELD)?;
    let token = body
        .and_then(|body| body.access_token)
        .filter(|token| !token.is_empty())
        .ok_or(NinjacatError::MissingAccessToken)?;

    debug!("token exchange succeeded");
    Ok(AccessToken::new(token))
}

impl NinjacatClient {
    /// Obtain the session token, exchanging credentials on first use
    ///
    /// Concurrent callers share a single exchange and all receive its outcome.
    /// Once it succeeds, every management call carries
    /// `Authorization: Bearer <token>` for the life of the client. A failure
    /// reaches every waiter as [`NinjacatError::Authentication`]. It is never
    /// retried automatically; a later call starts a fresh exchange unless the
    /// client was built with `retry_failed_authentication(false)`.
    pub async fn authenticate(&self) -> Result<AccessToken> {
        self.session.authenticate().await
    }

    /// Whether a token exchange has already completed successfully
    pub fn is_authenticated(&self) -> bool {
        self.session.current_token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_value() {
        let token = AccessToken::new("abc123");
        assert_eq!(token.bearer(), "Bearer abc123");
        assert_eq!(token.as_str(), "abc123");
    }

    #[test]
    fn test_debug_hides_token() {
        let token = AccessToken::new("abc123");
        assert_eq!(format!("{token:?}"), "AccessToken(***)");
    }

    #[test]
    fn test_clones_share_storage() {
        let token = AccessToken::new("abc123");
        let copy = token.clone();
        assert!(Arc::ptr_eq(&token.0, &copy.0));
    }

    fn unreachable_client(retry: bool) -> NinjacatClient {
        // Nothing listens on port 1
        NinjacatClient::builder(Credentials::new("id", "secret", 1, "agency", "report"))
            .api_base_url("http://127.0.0.1:1")
            .retry_failed_authentication(retry)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_failed_exchange_is_attempted_again() {
        let client = unreachable_client(true);
        for _ in 0..2 {
            let err = client.authenticate().await.unwrap_err();
            assert!(matches!(err, NinjacatError::Authentication(_)));
        }
        assert_eq!(client.session.lock().attempts, 2);
    }

    #[tokio::test]
    async fn test_sticky_failure_skips_network() {
        let client = unreachable_client(false);
        client.authenticate().await.unwrap_err();
        let err = client.authenticate().await.unwrap_err();

        match err {
            NinjacatError::Authentication(cause) => {
                assert!(matches!(cause.as_ref(), NinjacatError::Transport(_)));
            }
            other => panic!("expected authentication failure, got {other:?}"),
        }
        assert_eq!(client.session.lock().attempts, 1);
        assert!(!client.is_authenticated());
    }
}
