//! Agency credentials

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::ids::AgencyId;

/// Credentials issued to an agency, fixed for the lifetime of a client
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub agency_id: AgencyId,
    /// Sent as the `x-api-key` header on management calls
    pub agency_identifier: String,
    /// Shared secret for signing report tokens
    pub report_secret: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        agency_id: AgencyId,
        agency_identifier: impl Into<String>,
        report_secret: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            agency_id,
            agency_identifier: agency_identifier.into(),
            report_secret: report_secret.into(),
        }
    }

    /// Value for the `Authorization` header of the token exchange
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("agency_id", &self.agency_id)
            .field("agency_identifier", &self.agency_identifier)
            .field("report_secret", &"***")
            .finish()
    }
}
