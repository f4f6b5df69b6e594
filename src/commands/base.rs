//! Base types and traits for the command pattern

use crate::config::Config;
use anyhow::Result;
use ninjacat_client::NinjacatClient;

/// Context passed to all commands containing shared configuration and options
#[derive(Clone, Default)]
pub struct CommandContext {
    /// The loaded configuration
    pub config: Config,
    /// Print machine-readable JSON instead of human-readable output
    pub json: bool,
}

impl CommandContext {
    pub fn new(config: Config, json: bool) -> Self {
        Self { config, json }
    }

    /// API client for the configured agency
    pub fn client(&self) -> Result<NinjacatClient> {
        self.config.build_client()
    }
}

/// Trait that all commands must implement
#[async_trait::async_trait]
pub trait Command {
    /// Execute the command with the given context
    async fn execute(&self, context: &CommandContext) -> Result<()>;
}
