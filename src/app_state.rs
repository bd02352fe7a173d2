// =============================================================================
// Application State
// =============================================================================
//
// Shared across axum handlers via `Arc<AppState>`.  Holds the configuration
// and the analyzer, which in turn owns the cached providers.  The analysis
// itself keeps no state between requests.
// =============================================================================

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::analysis::Analyzer;
use crate::config::AppConfig;
use crate::providers::{Cache, FearGreedProvider, NoCache, TtlCache, YahooPriceProvider};
use crate::types::{PriceSeries, SentimentReading};

/// Yahoo rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (compatible; clarity-signal/1.0)";

pub struct AppState {
    pub config: AppConfig,
    pub analyzer: Analyzer,
    pub started_at: i64,
}

impl AppState {
    pub fn new(config: AppConfig, analyzer: Analyzer) -> Self {
        Self {
            config,
            analyzer,
            started_at: Utc::now().timestamp_millis(),
        }
    }

    /// Wire the HTTP providers and their caches from `config`.
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.http_timeout())
            .build()
            .context("failed to build reqwest client")?;

        // A zero TTL disables caching outright.
        let caching = config.cache_ttl_secs > 0;
        let price_cache: Arc<dyn Cache<PriceSeries>> = if caching {
            Arc::new(TtlCache::<PriceSeries>::new())
        } else {
            Arc::new(NoCache)
        };
        let sentiment_cache: Arc<dyn Cache<SentimentReading>> = if caching {
            Arc::new(TtlCache::<SentimentReading>::new())
        } else {
            Arc::new(NoCache)
        };

        let prices = YahooPriceProvider::new(
            client.clone(),
            config.price_api_base.clone(),
            price_cache,
            config.cache_ttl(),
        );
        let sentiment = FearGreedProvider::new(
            client,
            config.sentiment_api_base.clone(),
            sentiment_cache,
            config.cache_ttl(),
        );

        let analyzer = Analyzer::new(
            Arc::new(prices),
            Arc::new(sentiment),
            config.lookback_days,
            config.chart_points,
        );

        Ok(Self::new(config, analyzer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        let state = AppState::from_config(AppConfig::default()).unwrap();
        assert_eq!(state.config.default_ticker, "BTC-USD");
        assert!(state.started_at > 0);
    }

    #[test]
    fn builds_with_caching_disabled() {
        let config = AppConfig {
            cache_ttl_secs: 0,
            ..AppConfig::default()
        };
        assert!(AppState::from_config(config).is_ok());
    }
}
