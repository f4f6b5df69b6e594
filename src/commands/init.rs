//! Init command implementation

use super::{Command, CommandContext};
use crate::config::Config;
use crate::constants::config::env;
use anyhow::Result;
use async_trait::async_trait;
use colored::*;
use std::path::Path;

/// Init command for writing a configuration template
pub struct InitCommand {
    pub output: String,
    pub overwrite: bool,
}

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self, _context: &CommandContext) -> Result<()> {
        if Path::new(&self.output).exists() && !self.overwrite {
            return Err(anyhow::anyhow!(
                "Output file '{}' already exists. Use --overwrite to replace it.",
                self.output
            ));
        }

        Config::template().save(&self.output)?;

        println!(
            "{}",
            format!("Configuration template saved to '{}'", self.output).green()
        );
        println!(
            "Fill in your agency credentials, or set {} and friends in the environment.",
            env::CLIENT_ID
        );

        Ok(())
    }
}
