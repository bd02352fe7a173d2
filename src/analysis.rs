// =============================================================================
// Analyzer — one ticker, one point in time
// =============================================================================
//
// Pipeline:
//   1. Normalise and validate the ticker
//   2. Fetch the settled Fear & Greed reading
//   3. Fetch daily price history
//   4. Compute Bollinger / RSI / EMA-200 over the whole series
//   5. Pick the latest point where every indicator is defined
//   6. Evaluate BUY / SELL / HOLD
//   7. Build the report
//
// A failed fetch stops the pipeline before the evaluator runs.
// =============================================================================

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::SignalError;
use crate::indicators::compute_indicators;
use crate::indicators::engine::BOLLINGER_PERIOD;
use crate::providers::{PriceProvider, SentimentProvider};
use crate::report::AnalysisReport;
use crate::signals::evaluate_signal;

/// Longest symbol accepted; Yahoo symbols are well under this.
const MAX_TICKER_LEN: usize = 20;

/// Trim and upper-case `raw`, then check it against the Yahoo symbol charset
/// (`A-Z 0-9 . ^ = -`).  At least one character must be alphanumeric.
pub fn normalize_ticker(raw: &str) -> Result<String, SignalError> {
    let ticker = raw.trim().to_uppercase();
    let charset_ok = ticker
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || matches!(c, '.' | '^' | '=' | '-'));
    let has_alnum = ticker.chars().any(|c| c.is_ascii_alphanumeric());
    if ticker.len() > MAX_TICKER_LEN || !charset_ok || !has_alnum {
        return Err(SignalError::InvalidTicker);
    }
    Ok(ticker)
}

pub struct Analyzer {
    prices: Arc<dyn PriceProvider>,
    sentiment: Arc<dyn SentimentProvider>,
    lookback_days: u32,
    chart_points: usize,
}

impl Analyzer {
    pub fn new(
        prices: Arc<dyn PriceProvider>,
        sentiment: Arc<dyn SentimentProvider>,
        lookback_days: u32,
        chart_points: usize,
    ) -> Self {
        Self {
            prices,
            sentiment,
            lookback_days,
            chart_points,
        }
    }

    pub async fn analyze(&self, ticker: &str) -> Result<AnalysisReport, SignalError> {
        let ticker = normalize_ticker(ticker)?;

        let sentiment = self.sentiment.fetch_sentiment().await.map_err(|e| {
            warn!(ticker = %ticker, error = %e, "sentiment fetch failed");
            e
        })?;

        let series = self
            .prices
            .fetch_prices(&ticker, self.lookback_days)
            .await
            .map_err(|e| {
                warn!(ticker = %ticker, error = %e, "price fetch failed");
                e
            })?;

        let enriched = compute_indicators(&series)?;
        let latest = enriched
            .latest_complete()
            .ok_or(SignalError::InsufficientHistory {
                required: BOLLINGER_PERIOD,
                available: series.len(),
            })?;

        let signal = evaluate_signal(&latest.indicators, &sentiment)?;

        info!(
            ticker = %ticker,
            as_of = %latest.point.date,
            points = enriched.len(),
            signal = %signal.classification,
            price = signal.inputs.price,
            rsi = format!("{:.2}", signal.inputs.rsi),
            fng = sentiment.value,
            "analysis complete"
        );

        Ok(AnalysisReport::build(
            &ticker,
            latest.point.date,
            signal,
            sentiment,
            &enriched,
            self.chart_points,
        ))
    }
}
