//! Configuration file loading and saving

use super::validation;
use crate::constants::config::env;
use anyhow::{Context, Result};
use ninjacat_client::{AgencyId, Credentials, NinjacatClient, ResourceId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;

/// Agency credentials and endpoint overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Kept as text until validation so a bad value can be reported
    #[serde(
        default,
        deserialize_with = "deserialize_agency_id",
        serialize_with = "serialize_agency_id"
    )]
    pub agency_id: String,
    #[serde(default)]
    pub agency_identifier: String,
    #[serde(default)]
    pub report_secret: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_base_url: Option<String>,
}

impl Config {
    /// Load configuration from a file, then apply environment overrides
    pub fn load(path: &str) -> Result<Self> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` as the environment
    ///
    /// A missing file is not an error: everything may come from the
    /// environment. The merged result must pass validation.
    pub fn load_with_env<F>(path: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file '{}'", path))?;
            Self::from_yaml(&content)
                .with_context(|| format!("Failed to parse config file '{}'", path))?
        } else {
            Config::default()
        };

        config.apply_env(lookup);

        validation::validate_config(&config).map_err(validation::validation_errors_to_anyhow)?;

        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes as unit, not as a map
        if content.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Override fields with any non-empty environment values
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(env::CLIENT_ID) {
            self.client_id = v;
        }
        if let Some(v) = get(env::CLIENT_SECRET) {
            self.client_secret = v;
        }
        if let Some(v) = get(env::AGENCY_ID) {
            self.agency_id = v.trim().to_string();
        }
        if let Some(v) = get(env::AGENCY_IDENTIFIER) {
            self.agency_identifier = v;
        }
        if let Some(v) = get(env::REPORT_SECRET) {
            self.report_secret = v;
        }
        if let Some(v) = get(env::API_URL) {
            self.api_base_url = Some(v);
        }
        if let Some(v) = get(env::REPORT_URL) {
            self.report_base_url = Some(v);
        }
    }

    /// Numeric agency id, if the configured value is valid
    pub fn agency_id(&self) -> Option<AgencyId> {
        ninjacat_client::ids::parse_agency_id(&self.agency_id)
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let agency_id = self
            .agency_id()
            .with_context(|| format!("Agency id is not numeric: '{}'", self.agency_id))?;

        Ok(Credentials::new(
            self.client_id.clone(),
            self.client_secret.clone(),
            agency_id,
            self.agency_identifier.clone(),
            self.report_secret.clone(),
        ))
    }

    /// Build an API client from this configuration
    pub fn build_client(&self) -> Result<NinjacatClient> {
        let mut builder = NinjacatClient::builder(self.credentials()?);
        if let Some(url) = &self.api_base_url {
            builder = builder.api_base_url(url.clone());
        }
        if let Some(url) = &self.report_base_url {
            builder = builder.report_base_url(url.clone());
        }
        builder.build().context("Failed to create Ninjacat client")
    }

    /// Placeholder configuration written by `init`
    pub fn template() -> Self {
        Config {
            client_id: "your-client-id".to_string(),
            client_secret: "your-client-secret".to_string(),
            agency_id: "0".to_string(),
            agency_identifier: "your-agency-identifier".to_string(),
            report_secret: "your-report-secret".to_string(),
            api_base_url: None,
            report_base_url: None,
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;

        // Add document marker for yamllint compliance
        let yaml_content = format!("---\n{}", yaml);

        std::fs::write(path, yaml_content)
            .with_context(|| format!("Failed to write config file '{}'", path))?;

        Ok(())
    }
}

fn deserialize_agency_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(ResourceId::deserialize(deserializer)?.to_string())
}

fn serialize_agency_id<S>(value: &str, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match ninjacat_client::ids::parse_agency_id(value) {
        Some(id) => serializer.serialize_u64(id),
        None => serializer.serialize_str(value),
    }
}
