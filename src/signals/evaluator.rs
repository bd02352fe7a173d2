// =============================================================================
// Signal Evaluator — indicator snapshot + sentiment => BUY / SELL / HOLD
// =============================================================================
//
// Fixed thresholds, no configuration:
//
//   BUY  = RSI < 30  AND close < lower BB  AND close > EMA200  AND F&G < 40
//   SELL = RSI > 70  AND close > upper BB  AND F&G > 75
//   HOLD = otherwise
//
// BUY is checked before SELL.  With these constants the two can never both
// hold (the RSI bounds are disjoint); if the thresholds are ever made
// tunable, overlap becomes possible and the order decides.
// =============================================================================

use std::collections::BTreeMap;

use serde::Serialize;

use super::criteria::Criterion;
use crate::error::SignalError;
use crate::indicators::IndicatorSnapshot;
use crate::types::SentimentReading;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;
pub const SENTIMENT_FEAR_BELOW: u8 = 40;
pub const SENTIMENT_GREED_ABOVE: u8 = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalClass {
    Buy,
    Sell,
    Hold,
}

impl std::fmt::Display for SignalClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// The numbers the criteria were evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalInputs {
    pub price: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_lower: f64,
    pub ema_200: f64,
    pub sentiment_value: u8,
    pub sentiment_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalResult {
    pub classification: SignalClass,
    pub criteria: BTreeMap<Criterion, bool>,
    pub inputs: SignalInputs,
}

impl SignalResult {
    pub fn passed(&self, criterion: Criterion) -> bool {
        self.criteria.get(&criterion).copied().unwrap_or(false)
    }
}

fn require(value: Option<f64>, field: &'static str) -> Result<f64, SignalError> {
    value
        .filter(|v| v.is_finite())
        .ok_or(SignalError::IncompleteInput { field })
}

/// Classify the latest snapshot against the sentiment reading.
///
/// Every indicator field must be present; a `None` or non-finite value fails
/// with [`SignalError::IncompleteInput`] naming the first missing field.
pub fn evaluate_signal(
    latest: &IndicatorSnapshot,
    sentiment: &SentimentReading,
) -> Result<SignalResult, SignalError> {
    let price = require(Some(latest.close), "close")?;
    let bb_upper = require(latest.bb_upper, "bb_upper")?;
    let bb_lower = require(latest.bb_lower, "bb_lower")?;
    let rsi = require(latest.rsi, "rsi")?;
    let ema_200 = require(latest.ema_200, "ema_200")?;
    let fng = sentiment.value;

    let criteria: BTreeMap<Criterion, bool> = Criterion::ALL
        .into_iter()
        .map(|c| {
            let passed = match c {
                Criterion::RsiOversold => rsi < RSI_OVERSOLD,
                Criterion::PriceBelowBb => price < bb_lower,
                Criterion::TrendUp => price > ema_200,
                Criterion::SentimentFear => fng < SENTIMENT_FEAR_BELOW,
                Criterion::RsiOverbought => rsi > RSI_OVERBOUGHT,
                Criterion::PriceAboveBb => price > bb_upper,
                Criterion::SentimentGreed => fng > SENTIMENT_GREED_ABOVE,
            };
            (c, passed)
        })
        .collect();

    let all = |set: &[Criterion]| set.iter().all(|c| criteria[c]);

    let classification = if all(&[
        Criterion::RsiOversold,
        Criterion::PriceBelowBb,
        Criterion::TrendUp,
        Criterion::SentimentFear,
    ]) {
        SignalClass::Buy
    } else if all(&[
        Criterion::RsiOverbought,
        Criterion::PriceAboveBb,
        Criterion::SentimentGreed,
    ]) {
        SignalClass::Sell
    } else {
        SignalClass::Hold
    };

    Ok(SignalResult {
        classification,
        criteria,
        inputs: SignalInputs {
            price,
            rsi,
            bb_upper,
            bb_lower,
            ema_200,
            sentiment_value: fng,
            sentiment_label: sentiment.classification.clone(),
        },
    })
}
