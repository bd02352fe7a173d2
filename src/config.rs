// =============================================================================
// Application Configuration — JSON file + environment overrides
// =============================================================================
//
// All fields carry `#[serde(default)]` so that a partial (or empty) config
// file still loads.  Environment variables override the file for the handful
// of settings that commonly differ between deployments.
// =============================================================================

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_ticker() -> String {
    "BTC-USD".to_string()
}

fn default_lookback_days() -> u32 {
    300
}

fn default_chart_points() -> usize {
    180
}

fn default_cache_ttl_secs() -> u64 {
    600
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_price_api_base() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_sentiment_api_base() -> String {
    "https://api.alternative.me".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Ticker analysed by `GET /api/v1/analyze` when none is given.
    #[serde(default = "default_ticker")]
    pub default_ticker: String,

    /// Calendar days of price history requested per analysis.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Number of most recent points returned for the chart.
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,

    /// How long upstream responses stay cached.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    #[serde(default = "default_price_api_base")]
    pub price_api_base: String,

    #[serde(default = "default_sentiment_api_base")]
    pub sentiment_api_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            default_ticker: default_ticker(),
            lookback_days: default_lookback_days(),
            chart_points: default_chart_points(),
            cache_ttl_secs: default_cache_ttl_secs(),
            http_timeout_secs: default_http_timeout_secs(),
            price_api_base: default_price_api_base(),
            sentiment_api_base: default_sentiment_api_base(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            default_ticker = %config.default_ticker,
            lookback_days = config.lookback_days,
            "config loaded"
        );

        Ok(config)
    }

    /// Apply `CLARITY_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("CLARITY_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(ticker) = lookup("CLARITY_DEFAULT_TICKER").filter(|s| !s.trim().is_empty()) {
            self.default_ticker = ticker.trim().to_uppercase();
        }
        if let Some(raw) = lookup("CLARITY_CACHE_TTL_SECS") {
            match raw.trim().parse() {
                Ok(secs) => self.cache_ttl_secs = secs,
                Err(_) => warn!(value = %raw, "ignoring invalid CLARITY_CACHE_TTL_SECS"),
            }
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
