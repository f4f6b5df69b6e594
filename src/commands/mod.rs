//! Command implementations for the ninjacat CLI

pub mod advertisers;
pub mod auth;
pub mod base;
pub mod init;
pub mod report;
pub mod validators;

pub use advertisers::AdvertisersCommand;
pub use auth::AuthCommand;
pub use base::{Command, CommandContext};
pub use init::InitCommand;
pub use report::{GetReportCommand, RequestReportCommand};
