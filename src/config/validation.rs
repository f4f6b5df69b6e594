//! Configuration validation utilities
//!
//! All problems in a configuration are collected and reported together, so a
//! user fixing a config file sees every issue in one run.

use super::Config;
use anyhow::anyhow;

/// Enumeration of possible configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// A required credential is empty
    MissingField(&'static str),
    /// Agency id is not an unsigned integer
    InvalidAgencyId(String),
    /// Base URL override is not an http(s) URL
    InvalidUrl { field: &'static str, value: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::MissingField(field) => {
                write!(f, "Configuration field '{}' cannot be empty", field)
            }
            ConfigValidationError::InvalidAgencyId(value) => {
                write!(f, "Agency id must be numeric, got '{}'", value)
            }
            ConfigValidationError::InvalidUrl { field, value } => {
                write!(
                    f,
                    "Configuration field '{}' must start with http:// or https://, got '{}'",
                    field, value
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Validate a configuration, returning every problem found
pub fn validate_config(config: &Config) -> Result<(), Vec<ConfigValidationError>> {
    let mut errors = Vec::new();

    let required = [
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("agency_identifier", &config.agency_identifier),
        ("report_secret", &config.report_secret),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            errors.push(ConfigValidationError::MissingField(field));
        }
    }

    if config.agency_id.trim().is_empty() {
        errors.push(ConfigValidationError::MissingField("agency_id"));
    } else if config.agency_id().is_none() {
        errors.push(ConfigValidationError::InvalidAgencyId(
            config.agency_id.clone(),
        ));
    }

    let urls = [
        ("api_base_url", &config.api_base_url),
        ("report_base_url", &config.report_base_url),
    ];
    for (field, value) in urls {
        if let Some(url) = value
            && !is_http_url(url)
        {
            errors.push(ConfigValidationError::InvalidUrl {
                field,
                value: url.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn is_http_url(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    matches!(rest, Some(host) if !host.is_empty())
}

/// Convert validation errors to a single anyhow::Error
pub fn validation_errors_to_anyhow(errors: Vec<ConfigValidationError>) -> anyhow::Error {
    let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow!("Invalid configuration:\n  {}", messages.join("\n  "))
}
