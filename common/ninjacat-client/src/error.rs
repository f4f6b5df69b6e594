//! Error taxonomy for Ninjacat API calls

use std::sync::Arc;

use thiserror::Error;

/// Errors surfaced by [`NinjacatClient`](crate::NinjacatClient)
///
/// Nothing is retried or swallowed: every failure reaches the caller in one of
/// these shapes.
#[derive(Debug, Error)]
pub enum NinjacatError {
    /// Connection, DNS, TLS or body-read failure from the HTTP stack
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status with an empty or unparseable body
    #[error("received status code {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Management API body carrying an `error` field
    #[error("api error: {0}")]
    Api(String),

    /// Report service body carrying an `error_message` field
    #[error("report error: {0}")]
    Report(String),

    /// The shared token exchange failed; every waiter receives the same cause
    #[error("authentication failed: {0}")]
    Authentication(#[source] Arc<NinjacatError>),

    #[error("token response did not include an access token")]
    MissingAccessToken,

    #[error("failed to sign report token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unknown report status {0}")]
    UnknownReportStatus(i64),

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),
}

impl NinjacatError {
    /// Server-supplied message for application-level failures
    pub fn server_message(&self) -> Option<&str> {
        match self {
            NinjacatError::Api(msg) | NinjacatError::Report(msg) => Some(msg),
            NinjacatError::Authentication(cause) => cause.server_message(),
            _ => None,
        }
    }

    /// Status code when the failure came from an unsuccessful HTTP response
    pub fn status(&self) -> Option<u16> {
        match self {
            NinjacatError::HttpStatus { status, .. } => Some(*status),
            NinjacatError::Transport(err) => err.status().map(|s| s.as_u16()),
            NinjacatError::Authentication(cause) => cause.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NinjacatError>;
