//! Ninjacat client implementation
//!
//! `NinjacatClient` owns the HTTP client, the agency credentials and the
//! memoized session. Endpoint groups extend it with `impl` blocks in their own
//! modules:
//! - `session.rs` - OAuth2 token exchange
//! - `reports.rs` - signed report start and poll
//! - `advertisers.rs` - advertiser listing
//!
//! Generic authenticated management calls (`get`, `post`, `delete`) live here.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::credentials::Credentials;
use crate::error::{NinjacatError, Result};
use crate::response::{API_ERROR_FIELD, RawResponse};
use crate::session::Session;

/// Management and OAuth2 API host
pub const API_BASE_URL: &str = "https://api.ninjacat.io";

/// Report service host
pub const REPORT_BASE_URL: &str = "https://app.ninjacat.io";

/// Client for the Ninjacat management and report APIs
///
/// One client holds at most one access token; it is fetched lazily by the first
/// call that needs it and shared by every later call.
///
/// ```rust,no_run
/// use ninjacat_client::{Credentials, NinjacatClient};
///
/// # async fn example() -> ninjacat_client::Result<()> {
/// let client = NinjacatClient::new(Credentials::new(
///     "client-id",
///     "client-secret",
///     1234,
///     "agency-identifier",
///     "report-secret",
/// ))?;
///
/// for advertiser in client.advertisers().await? {
///     println!("{} {}", advertiser.id, advertiser.name);
/// }
/// # Ok(())
/// # }
/// ```
pub struct NinjacatClient {
    pub(crate) http: Client,
    pub(crate) credentials: Credentials,
    pub(crate) api_base_url: String,
    pub(crate) report_base_url: String,
    pub(crate) session: Session,
}

/// Builder for [`NinjacatClient`]
#[derive(Debug)]
pub struct NinjacatClientBuilder {
    credentials: Credentials,
    api_base_url: String,
    report_base_url: String,
    retry_failed_authentication: bool,
    timeout: Option<Duration>,
}

impl NinjacatClientBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn report_base_url(mut self, url: impl Into<String>) -> Self {
        self.report_base_url = url.into();
        self
    }

    /// Whether a failed token exchange may be attempted again
    ///
    /// When `false`, the first failure is remembered and returned to every
    /// later `authenticate()` call without touching the network.
    pub fn retry_failed_authentication(mut self, retry: bool) -> Self {
        self.retry_failed_authentication = retry;
        self
    }

    /// Whole-request timeout applied by the HTTP client; none by default
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<NinjacatClient> {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        let api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        let report_base_url = self.report_base_url.trim_end_matches('/').to_string();

        let session = Session::new(
            http.clone(),
            join_url(&api_base_url, "oauth2/token"),
            self.credentials.clone(),
            self.retry_failed_authentication,
        );

        Ok(NinjacatClient {
            http,
            credentials: self.credentials,
            api_base_url,
            report_base_url,
            session,
        })
    }
}

impl NinjacatClient {
    /// Create a client against the production hosts
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    pub fn builder(credentials: Credentials) -> NinjacatClientBuilder {
        NinjacatClientBuilder {
            credentials,
            api_base_url: API_BASE_URL.to_string(),
            report_base_url: REPORT_BASE_URL.to_string(),
            retry_failed_authentication: true,
            timeout: None,
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn report_base_url(&self) -> &str {
        &self.report_base_url
    }

    /// GET an arbitrary management endpoint under the session
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.management_call::<T, ()>(Method::GET, endpoint, None)
            .await
    }

    /// POST to an arbitrary management endpoint, with an optional JSON body
    pub async fn post<T, B>(&self, endpoint: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.management_call(Method::POST, endpoint, body).await
    }

    /// DELETE an arbitrary management endpoint under the session
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.management_call::<T, ()>(Method::DELETE, endpoint, None)
            .await
    }

    /// Authenticated management request decoded as a single JSON value
    pub(crate) async fn management_call<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let token = self.authenticate().await?;
        let url = join_url(&self.api_base_url, endpoint);
        debug!(%method, %url, "management request");

        let mut request = self
            .http
            .request(method, &url)
            .headers(management_headers(&self.credentials)?)
            .header(AUTHORIZATION, token.bearer())
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        self.send(request).await?.decode(API_ERROR_FIELD)
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<RawResponse> {
        let response = request.send().await?;
        let raw = RawResponse::read(response).await?;
        debug!(status = raw.status.as_u16(), "response received");
        Ok(raw)
    }
}

/// Headers every management-host request carries
pub(crate) fn management_headers(credentials: &Credentials) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        "client-id",
        HeaderValue::from_str(&credentials.client_id)
            .map_err(|_| NinjacatError::InvalidHeader("client-id"))?,
    );
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        "x-api-key",
        HeaderValue::from_str(&credentials.agency_identifier)
            .map_err(|_| NinjacatError::InvalidHeader("x-api-key"))?,
    );
    Ok(headers)
}

/// Join a base URL and a path with exactly one slash between them
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
