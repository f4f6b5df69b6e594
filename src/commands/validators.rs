//! Command argument validation utilities
//!
//! This module provides centralized validation logic for command arguments
//! after clap parsing. It handles domain-specific validation rules that
//! go beyond basic argument parsing.

use crate::constants::report::DATE_FORMAT;
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use ninjacat_client::{ReportRange, ResourceId};

/// Validation errors for command arguments
#[derive(Debug, PartialEq)]
pub enum CommandValidationError {
    /// Required argument was empty
    EmptyValue { argument: String },
    /// Invalid argument value
    InvalidValue {
        argument: String,
        value: String,
        reason: String,
    },
    /// Date window ends before it starts
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

impl std::fmt::Display for CommandValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandValidationError::EmptyValue { argument } => {
                write!(f, "{} cannot be empty", argument)
            }
            CommandValidationError::InvalidValue {
                argument,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for {}: {}", value, argument, reason)
            }
            CommandValidationError::InvertedRange { start, end } => {
                write!(f, "Start date {} is after end date {}", start, end)
            }
        }
    }
}

impl std::error::Error for CommandValidationError {}

/// Convert validation error to anyhow::Error
pub fn validation_error_to_anyhow(error: CommandValidationError) -> anyhow::Error {
    anyhow!(error.to_string())
}

/// Validate a template or advertiser identifier
///
/// Purely numeric values are sent as numbers, anything else as text.
pub fn validate_identifier(argument: &str, value: &str) -> Result<ResourceId> {
    let value = value.trim();
    if value.is_empty() {
        return Err(validation_error_to_anyhow(
            CommandValidationError::EmptyValue {
                argument: argument.to_string(),
            },
        ));
    }
    if value.contains('/') {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: argument.to_string(),
                value: value.to_string(),
                reason: "identifiers cannot contain '/'".to_string(),
            },
        ));
    }

    Ok(match value.parse::<u64>() {
        Ok(n) => ResourceId::Number(n),
        Err(_) => ResourceId::Text(value.to_string()),
    })
}

/// Parse an optional `YYYY-MM-DD` date argument
pub fn validate_date(argument: &str, value: &Option<String>) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };

    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            validation_error_to_anyhow(CommandValidationError::InvalidValue {
                argument: argument.to_string(),
                value: value.clone(),
                reason: "expected a date formatted as YYYY-MM-DD".to_string(),
            })
        })
}

/// Build the report window from the date arguments
pub fn validate_report_range(
    start_date: &Option<String>,
    end_date: &Option<String>,
) -> Result<Option<ReportRange>> {
    let start = validate_date("--start-date", start_date)?;
    let end = validate_date("--end-date", end_date)?;

    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvertedRange { start, end },
        ));
    }

    let range = ReportRange {
        start_date: start,
        end_date: end,
    };
    Ok((!range.is_empty()).then_some(range))
}

/// Validate polling options used with --wait
pub fn validate_polling(interval: u64, max_polls: u32) -> Result<()> {
    if interval == 0 {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "--interval".to_string(),
                value: interval.to_string(),
                reason: "must be at least 1 second".to_string(),
            },
        ));
    }
    if max_polls == 0 {
        return Err(validation_error_to_anyhow(
            CommandValidationError::InvalidValue {
                argument: "--max-polls".to_string(),
                value: max_polls.to_string(),
                reason: "must be at least 1".to_string(),
            },
        ));
    }
    Ok(())
}
