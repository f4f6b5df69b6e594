//! Report commands implementation
//!
//! The client library never sleeps; waiting for a report is done here, on the
//! caller side, with a fixed interval and a bounded number of polls.

use super::{Command, CommandContext};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use colored::*;
use ninjacat_client::{NinjacatClient, Report, ReportRange, ReportStatus, RequestId, ResourceId};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Output format for a poll result in JSON mode
#[derive(Serialize)]
struct StatusOutput<'a> {
    request_id: RequestId,
    status: &'static str,
    id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a [Report]>,
}

/// Start a report run, optionally waiting until it is ready
pub struct RequestReportCommand {
    pub template_id: ResourceId,
    pub advertiser_id: ResourceId,
    pub range: Option<ReportRange>,
    pub wait: bool,
    pub interval: Duration,
    pub max_polls: u32,
}

/// Poll a report run once
pub struct GetReportCommand {
    pub request_id: RequestId,
}

#[async_trait]
impl Command for RequestReportCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let request = client
            .request_report(
                self.template_id.clone(),
                self.advertiser_id.clone(),
                self.range.as_ref(),
            )
            .await
            .with_context(|| {
                format!(
                    "Failed to request report for template {} and advertiser {}",
                    self.template_id, self.advertiser_id
                )
            })?;

        if !self.wait {
            if context.json {
                println!(
                    "{}",
                    serde_json::json!({ "request_id": request.request_id })
                );
            } else {
                println!(
                    "{} {}",
                    "Report requested, request id".green(),
                    request.request_id.to_string().bold()
                );
            }
            return Ok(());
        }

        if !context.json {
            println!(
                "{}",
                format!(
                    "Report requested (request id {}), waiting for it to finish...",
                    request.request_id
                )
                .green()
            );
        }

        let status =
            wait_for_report(&client, request.request_id, self.interval, self.max_polls).await?;
        print_status(request.request_id, &status, context.json)
    }
}

#[async_trait]
impl Command for GetReportCommand {
    async fn execute(&self, context: &CommandContext) -> Result<()> {
        let client = context.client()?;
        let status = client
            .get_report(self.request_id)
            .await
            .with_context(|| format!("Failed to fetch report {}", self.request_id))?;
        print_status(self.request_id, &status, context.json)
    }
}

/// Poll until the report is ready, an error is returned, or polls run out
pub async fn wait_for_report(
    client: &NinjacatClient,
    request_id: RequestId,
    interval: Duration,
    max_polls: u32,
) -> Result<ReportStatus> {
    for poll in 1..=max_polls {
        let status = client
            .get_report(request_id)
            .await
            .with_context(|| format!("Failed to fetch report {}", request_id))?;
        debug!(request_id, poll, status = status_name(&status), "polled report");

        if status.is_ready() {
            return Ok(status);
        }
        if poll < max_polls {
            tokio::time::sleep(interval).await;
        }
    }

    bail!(
        "Report {} was not ready after {} polls",
        request_id,
        max_polls
    )
}

pub fn status_name(status: &ReportStatus) -> &'static str {
    match status {
        ReportStatus::Pending { .. } => "pending",
        ReportStatus::Running { .. } => "running",
        ReportStatus::Ready { .. } => "ready",
    }
}

fn print_status(request_id: RequestId, status: &ReportStatus, json: bool) -> Result<()> {
    if json {
        let data = match status {
            ReportStatus::Ready { data, .. } => Some(data.as_slice()),
            _ => None,
        };
        let output = StatusOutput {
            request_id,
            status: status_name(status),
            id: status.id(),
            data,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match status {
        ReportStatus::Pending { id } => {
            println!("{} {}", "Report pending".yellow(), format!("(id {id})").dimmed());
        }
        ReportStatus::Running { id } => {
            println!("{} {}", "Report running".yellow(), format!("(id {id})").dimmed());
        }
        ReportStatus::Ready { id, data } => {
            println!(
                "{} {}",
                format!("Report ready with {} section(s)", data.len()).green(),
                format!("(id {id})").dimmed()
            );
            for report in data {
                print_report(report);
            }
        }
    }
    Ok(())
}

fn print_report(report: &Report) {
    let marker = if report.success {
        "•".blue()
    } else {
        "✗".red()
    };
    println!(
        "{} {} ({} rows{})",
        marker,
        report.title.bold(),
        report.data_rows.rows.len(),
        if report.data_rows.data_sampled {
            ", sampled"
        } else {
            ""
        }
    );
    for (key, error) in &report.errors {
        let message = error
            .message()
            .unwrap_or_else(|| "unknown error".to_string());
        println!("  {} {}: {}", "!".red(), key, message);
    }
}
