//! Ninjacat - a CLI for the Ninjacat reporting API
//!
//! The API client itself lives in the `ninjacat-client` crate and is
//! re-exported here as [`client`].

pub mod commands;
pub mod config;
pub mod constants;
pub mod logging;

pub type Result<T> = anyhow::Result<T>;

pub use ninjacat_client as client;

// Re-export commonly used types
pub use commands::{Command, CommandContext};
pub use config::Config;

/// Helper to load the default config file merged with the environment
pub fn load_default_config() -> anyhow::Result<Config> {
    Config::load(constants::config::DEFAULT_CONFIG_FILE)
}
