//! Ninjacat API client library
//!
//! Client for the Ninjacat marketing-reporting service: OAuth2 client
//! credential sessions, signed report requests and polls, and advertiser
//! listings.
//!
//! ## Modules
//!
//! - [`client`]: Core client, builder and generic management calls
//! - [`session`]: Single-flight OAuth2 token acquisition
//! - [`reports`]: Report start and poll with per-call signed tokens
//! - [`advertisers`]: Advertiser listing
//! - [`signing`]: Report token payloads
//! - [`error`]: Error taxonomy

pub mod advertisers;
pub mod client;
pub mod credentials;
pub mod error;
pub mod ids;
mod lenient;
mod response;
pub mod reports;
pub mod session;
pub mod signing;

// Re-export public API
pub use advertisers::{Advertiser, CustomField, CustomFieldValue};
pub use client::{API_BASE_URL, NinjacatClient, NinjacatClientBuilder, REPORT_BASE_URL};
pub use credentials::Credentials;
pub use error::{NinjacatError, Result};
pub use ids::{AdvertiserId, AgencyId, ReportId, RequestId, ResourceId};
pub use reports::{DataRows, Report, ReportRange, ReportRequest, ReportStatus, Row, WidgetError};
pub use session::AccessToken;
