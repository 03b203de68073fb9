use serde::Deserialize;
use std::path::{Path, PathBuf};

use dye_color::DistanceMetric;

/// Application configuration loaded from dyematch.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// External catalog JSON overriding the embedded one
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,

    /// External name table CSV overriding the embedded one
    #[serde(default)]
    pub names_file: Option<PathBuf>,

    /// Base URL of the market price API
    #[serde(default = "default_price_api_base")]
    pub price_api_base: String,

    /// World queried when the CLI does not name one
    #[serde(default = "default_world")]
    pub default_world: String,

    /// Minimum delay between price requests, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Retry attempts for rate-limited or failed price requests
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry backoff, in milliseconds (doubles per attempt)
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    /// Maximum cached price responses
    #[serde(default = "default_price_cache_capacity")]
    pub price_cache_capacity: usize,

    /// Price response time-to-live, in seconds
    #[serde(default = "default_price_cache_ttl_secs")]
    pub price_cache_ttl_secs: u64,

    /// Per-function capacity of the conversion cache
    #[serde(default = "default_conversion_cache_capacity")]
    pub conversion_cache_capacity: usize,

    /// Distance metric used when the CLI does not name one
    #[serde(default = "default_metric")]
    pub default_metric: String,
}

fn default_price_api_base() -> String {
    "https://universalis.app/api/v2".to_string()
}

fn default_world() -> String {
    "Ragnarok".to_string()
}

fn default_request_delay_ms() -> u64 {
    100
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    1000
}

fn default_price_cache_capacity() -> usize {
    100
}

fn default_price_cache_ttl_secs() -> u64 {
    300
}

fn default_conversion_cache_capacity() -> usize {
    dye_color::DEFAULT_CACHE_CAPACITY
}

fn default_metric() -> String {
    "rgb".to_string()
}

impl AppConfig {
    /// Load configuration from `DYEMATCH_CONFIG` or `./dyematch.yaml`.
    ///
    /// A missing file is normal and yields defaults; a malformed file is
    /// logged and also yields defaults, never a hard failure.
    pub fn load() -> Self {
        let path = std::env::var("DYEMATCH_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("dyematch.yaml"));
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                Self::default()
            }
        }
    }

    /// The configured default metric, falling back to RGB on a bad name.
    pub fn metric(&self) -> DistanceMetric {
        match DistanceMetric::parse_name(&self.default_metric) {
            Some(metric) => metric,
            None => {
                tracing::warn!(
                    metric = %self.default_metric,
                    "Unknown default_metric in config, falling back to rgb"
                );
                DistanceMetric::Rgb
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_file: None,
            names_file: None,
            price_api_base: default_price_api_base(),
            default_world: default_world(),
            request_delay_ms: default_request_delay_ms(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            price_cache_capacity: default_price_cache_capacity(),
            price_cache_ttl_secs: default_price_cache_ttl_secs(),
            conversion_cache_capacity: default_conversion_cache_capacity(),
            default_metric: default_metric(),
        }
    }
}
