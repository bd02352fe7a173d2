// =============================================================================
// Data Providers
// =============================================================================
//
// The analysis pipeline only sees these two traits.  Concrete providers talk
// HTTP, normalise the upstream format into core types, and consult an
// injected TTL cache before going to the network.  Providers never retry; a
// failed fetch becomes `SignalError::UpstreamFetch` for the caller to handle.

pub mod cache;
pub mod fear_greed;
pub mod yahoo;

use async_trait::async_trait;

use crate::error::SignalError;
use crate::types::{PriceSeries, SentimentReading};

pub use cache::{Cache, NoCache, TtlCache};
pub use fear_greed::FearGreedProvider;
pub use yahoo::YahooPriceProvider;

#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily history for `symbol` covering roughly the last `lookback_days`,
    /// oldest first.
    async fn fetch_prices(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, SignalError>;
}

#[async_trait]
pub trait SentimentProvider: Send + Sync {
    /// The most recent *settled* sentiment reading.
    async fn fetch_sentiment(&self) -> Result<SentimentReading, SignalError>;
}

/// Lower-case a column name and replace spaces with underscores
/// ("Adj Close" => "adj_close").
pub fn normalize_column(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
