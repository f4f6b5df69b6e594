//! Common test support utilities and fixtures
//!
//! Shared by the integration tests through `mod support;`. Every helper talks to
//! a wiremock server standing in for both the management and report hosts.

#![allow(dead_code)]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use jsonwebtoken::{DecodingKey, Validation};
use ninjacat::client::{Credentials, NinjacatClient};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const AGENCY_ID: u64 = 77;
pub const AGENCY_IDENTIFIER: &str = "agency-key-77";
pub const REPORT_SECRET: &str = "report-signing-secret";
pub const ACCESS_TOKEN: &str = "session-token-abc123";

pub fn credentials() -> Credentials {
    Credentials::new(
        CLIENT_ID,
        CLIENT_SECRET,
        AGENCY_ID,
        AGENCY_IDENTIFIER,
        REPORT_SECRET,
    )
}

/// Client whose management and report hosts both point at `server`
pub fn client_for(server: &MockServer) -> NinjacatClient {
    NinjacatClient::builder(credentials())
        .api_base_url(server.uri())
        .report_base_url(server.uri())
        .build()
        .expect("Failed to build client")
}

/// Expected Basic authorization header for the test credentials
pub fn basic_header() -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", CLIENT_ID, CLIENT_SECRET))
    )
}

pub fn bearer_header() -> String {
    format!("Bearer {}", ACCESS_TOKEN)
}

/// Mount a token endpoint answering with `ACCESS_TOKEN`, expected `times` times
pub async fn mount_token_endpoint(server: &MockServer, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"access_token": ACCESS_TOKEN, "token_type": "bearer"})),
        )
        .expect(times)
        .named("token exchange")
        .mount(server)
        .await;
}

/// Header value of a recorded request
pub fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Decode the JWT bearer of a recorded report request
pub fn report_claims(request: &Request) -> Value {
    let authorization = header(request, "authorization").expect("Missing authorization header");
    let token = authorization
        .strip_prefix("Bearer ")
        .expect("Authorization is not a bearer token");

    let mut validation = Validation::default();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;

    jsonwebtoken::decode::<Value>(
        token,
        &DecodingKey::from_secret(REPORT_SECRET.as_bytes()),
        &validation,
    )
    .expect("Report token did not verify with the report secret")
    .claims
}

/// Requests the server received for `request_path`
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}

/// A complete advertiser record as the management API sends it
pub fn advertiser_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "phone": "+1 555 0100",
        "company": format!("{} Inc", name),
        "email": format!("{}@example.com", name.to_lowercase()),
        "website": format!("https://{}.example.com", name.to_lowercase()),
        "external_id": format!("ext-{}", id),
        "phone_conv_period": 30,
        "phone_conv_threshold": 60,
        "owner_id": 12,
        "date_format": 1,
        "digit_format": 0,
        "timezone": "America/Denver",
        "currency_pre_format": "$",
        "currency_post_format": "",
        "ninjatrack_email": "track@example.com",
        "only_conv_notify": 0,
        "anonymize_callers": 1,
        "budget": 1500.5,
        "budget_warning": 80.5,
        "budget_critical": 95.5,
        "facebook_campaigns": "",
        "tools_keyword_filter": "",
        "use_phone_mappings": 0,
        "custom_field": "tier",
        "account_custom_field_values": [
            {"id": 3, "custom_field_id": 1, "name": "Gold", "advertiserIds": [id, 900]}
        ]
    })
}
