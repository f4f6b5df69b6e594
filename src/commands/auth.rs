//! Auth command implementation

use super::{Command, CommandContext};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;

/// Exchange the configured credentials for a session token
pub struct AuthCommand;

#[async_trait]
impl Command for AuthCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let token = client
            .authenticate()
            .await
            .context("Failed to authenticate with Ninjacat")?;

        if context.json {
            let output = serde_json::json!({
                "authenticated": true,
                "token": mask_token(token.as_str()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!(
            "{} {}",
            "Authenticated as client".green(),
            client.credentials().client_id.bold()
        );
        println!("  token: {}", mask_token(token.as_str()).dimmed());
        Ok(())
    }
}

/// Show only the last four characters of a token
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}
