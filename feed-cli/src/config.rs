//! Configuration loading for the gallery CLI.
//!
//! Configuration is loaded from a TOML file (default: `gallery.toml` in the
//! data directory). Every key is optional; a missing file means defaults.

use feed_client::{FeedConfig, RetryPolicy};
use feed_types::{SortDirection, SortField, SortParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name inside the data directory.
pub const CONFIG_FILE: &str = "gallery.toml";

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote service.
    #[serde(default)]
    pub api: ApiConfig,
    /// Pagination.
    #[serde(default)]
    pub feed: FeedSection,
    /// Retry schedule.
    #[serde(default)]
    pub retry: RetrySection,
    /// Initial sort order.
    #[serde(default)]
    pub sort: SortParams,
}

/// Remote service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Image list endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Event whose images are listed.
    #[serde(default = "default_collection_id")]
    pub collection_id: String,
    /// API key sent as the `key` query parameter.
    #[serde(default = "default_api_key")]
    pub api_key: Option<String>,
}

/// Pagination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSection {
    /// Records per page (default: 40).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySection {
    /// Attempts per page, including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry, doubled each time (default: 1000).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
}

fn default_endpoint() -> String {
    "https://openapi.fotoowl.ai/open/event/image-list".to_string()
}

fn default_collection_id() -> String {
    "154770".to_string()
}

fn default_api_key() -> Option<String> {
    Some("4030".to_string())
}

fn default_page_size() -> u32 {
    40
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            collection_id: default_collection_id(),
            api_key: default_api_key(),
        }
    }
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for RetrySection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load `path` if it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Library configuration, with `sort` overriding the configured order.
    pub fn feed_config(&self, sort: Option<SortParams>) -> FeedConfig {
        FeedConfig::new(&self.api.collection_id)
            .with_page_size(self.feed.page_size)
            .with_retry(RetryPolicy::new(
                self.retry.max_attempts,
                Duration::from_millis(self.retry.base_delay_ms),
            ))
            .with_sort(sort.unwrap_or(self.sort))
    }

    /// Sort order from command-line flags, falling back to configured values.
    pub fn sort_override(&self, field: Option<SortField>, descending: bool) -> Option<SortParams> {
        if field.is_none() && !descending {
            return None;
        }
        let direction = if descending {
            SortDirection::Descending
        } else {
            self.sort.direction
        };
        Some(SortParams::new(field.unwrap_or(self.sort.field), direction))
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}
