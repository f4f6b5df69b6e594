//! Report service token signing
//!
//! Report endpoints do not use the OAuth2 session. Each call carries its own
//! HS256 token whose payload names the resources being touched, signed with the
//! agency's report secret. Tokens carry `iat` but no `exp`.

use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::{AgencyId, RequestId, ResourceId};

/// Payload for starting a report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStartClaims {
    pub agency_id: AgencyId,
    pub template_id: ResourceId,
    pub advertiser_id: ResourceId,
    pub iat: i64,
}

/// Payload for polling a report run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPollClaims {
    pub agency_id: AgencyId,
    pub request_id: RequestId,
    pub iat: i64,
}

impl ReportStartClaims {
    pub fn new(agency_id: AgencyId, template_id: ResourceId, advertiser_id: ResourceId) -> Self {
        Self {
            agency_id,
            template_id,
            advertiser_id,
            iat: issued_at(),
        }
    }
}

impl ReportPollClaims {
    pub fn new(agency_id: AgencyId, request_id: RequestId) -> Self {
        Self {
            agency_id,
            request_id,
            iat: issued_at(),
        }
    }
}

fn issued_at() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Sign claims with the report secret
pub fn sign<C: Serialize>(claims: &C, secret: &str) -> Result<String> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    Ok(jsonwebtoken::encode(&Header::default(), claims, &key)?)
}
