//! Advertisers command implementation

use super::{Command, CommandContext};
use anyhow::{Context, Result};
use async_trait::async_trait;
use colored::*;

/// List the advertisers of the configured agency
pub struct AdvertisersCommand;

#[async_trait]
impl Command for AdvertisersCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let advertisers = client
            .advertisers()
            .await
            .context("Failed to list advertisers")?;

        if context.json {
            // Advertisers serialize back to the fields the service sent
            println!("{}", serde_json::to_string_pretty(&advertisers)?);
            return Ok(());
        }

        if advertisers.is_empty() {
            println!("{}", "No advertisers found".yellow());
            return Ok(());
        }

        println!(
            "{}",
            format!("Found {} advertisers", advertisers.len()).green()
        );
        println!();

        for advertiser in &advertisers {
            println!(
                "{} {} {}",
                "•".blue(),
                advertiser.name.bold(),
                format!("(id {})", advertiser.id).dimmed()
            );
            if let Some(company) = advertiser.company.as_deref().filter(|c| !c.is_empty()) {
                println!("  company: {}", company);
            }
            if let Some(website) = advertiser.website.as_deref().filter(|w| !w.is_empty()) {
                println!("  website: {}", website);
            }
            if !advertiser.account_custom_field_values.is_empty() {
                let names: Vec<&str> = advertiser
                    .account_custom_field_values
                    .iter()
                    .map(|v| v.name.as_str())
                    .collect();
                println!("  custom fields: {}", names.join(", "));
            }
        }

        Ok(())
    }
}
