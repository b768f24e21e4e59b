//! Runtime configuration.
//!
//! Built once at startup, either from the environment or from a TOML file,
//! then handed by reference to the clients and the scheduler.

#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::scheduler::OverlapPolicy;
use crate::utils::error::{Result, SyncError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2025-01";
pub const DEFAULT_BACKMARKET_API_URL: &str = "https://api.backmarket.com/v1";
pub const DEFAULT_PORT: u16 = 7001;
pub const DEFAULT_SCHEDULE: &str = "*/5 * * * *";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Store host (`shop.myshopify.com`) or a full origin with scheme.
    pub store_url: String,
    pub access_token: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DestinationConfig {
    #[serde(default = "default_backmarket_url")]
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_cron")]
    pub cron: String,
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

fn default_api_version() -> String {
    DEFAULT_SHOPIFY_API_VERSION.to_string()
}

fn default_backmarket_url() -> String {
    DEFAULT_BACKMARKET_API_URL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_cron() -> String {
    DEFAULT_SCHEDULE.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
            overlap: OverlapPolicy::default(),
        }
    }
}

// Tokens stay out of Debug output.
impl fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceConfig")
            .field("store_url", &self.store_url)
            .field("access_token", &"<redacted>")
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl fmt::Debug for DestinationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DestinationConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl SourceConfig {
    /// `https://{store}/admin/api/{version}`
    pub fn api_base_url(&self) -> String {
        let store = self.store_url.trim_end_matches('/');
        if store.contains("://") {
            format!("{}/admin/api/{}", store, self.api_version)
        } else {
            format!("https://{}/admin/api/{}", store, self.api_version)
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ScheduleConfig {
    /// Parses the cron expression. Five-field expressions get an implicit
    /// `0` seconds field.
    pub fn parse(&self) -> Result<cron::Schedule> {
        let expression = self.cron.trim();
        let normalized = if expression.split_whitespace().count() == 5 {
            format!("0 {}", expression)
        } else {
            expression.to_string()
        };

        cron::Schedule::from_str(&normalized).map_err(|e| SyncError::Schedule {
            expression: self.cron.clone(),
            message: e.to_string(),
        })
    }
}

impl SyncConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unset and empty values count as
    /// missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| SyncError::MissingConfig {
                field: key.to_string(),
            })
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| SyncError::InvalidConfigValue {
                    field: "PORT".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_PORT,
        };

        let overlap = match get("SYNC_OVERLAP_POLICY") {
            Some(raw) => raw.parse::<OverlapPolicy>()?,
            None => OverlapPolicy::default(),
        };

        Ok(Self {
            source: SourceConfig {
                store_url: require("SHOPIFY_STORE_URL")?,
                access_token: require("SHOPIFY_ACCESS_TOKEN")?,
                api_version: get("SHOPIFY_API_VERSION").unwrap_or_else(default_api_version),
            },
            destination: DestinationConfig {
                base_url: get("BACKMARKET_API_URL").unwrap_or_else(default_backmarket_url),
                api_key: require("BACKMARKET_API_KEY")?,
            },
            server: ServerConfig {
                host: get("HOST").unwrap_or_else(default_host),
                port,
            },
            schedule: ScheduleConfig {
                cron: get("SYNC_SCHEDULE").unwrap_or_else(default_cron),
                overlap,
            },
        })
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("source.store_url", &self.source.store_url)?;
        validation::validate_resolved("source.store_url", &self.source.store_url)?;
        validation::validate_url("source.store_url", &self.source.api_base_url())?;
        validation::validate_secret("source.access_token", &self.source.access_token)?;
        validation::validate_non_empty_string("source.api_version", &self.source.api_version)?;

        validation::validate_resolved("destination.base_url", &self.destination.base_url)?;
        validation::validate_url("destination.base_url", &self.destination.base_url)?;
        validation::validate_secret("destination.api_key", &self.destination.api_key)?;

        validation::validate_positive_number("server.port", usize::from(self.server.port), 1)?;
        self.schedule.parse()?;

        Ok(())
    }
}
