// =============================================================================
// Indicator Engine — price series => per-point indicator snapshots
// =============================================================================
//
// Runs Bollinger(20, 2σ), RSI(14) and EMA(200) over the closes of a
// `PriceSeries` and zips the results into one `IndicatorSnapshot` per point.
// The input is only borrowed; the enriched series is a fresh allocation.
// =============================================================================

use serde::Serialize;

use super::{bollinger, ema, rsi};
use crate::error::SignalError;
use crate::types::{PricePoint, PriceSeries};

pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_NUM_STD: f64 = 2.0;
pub const RSI_PERIOD: usize = 14;
pub const EMA_TREND_SPAN: usize = 200;

/// Indicator values at a single point.  `None` means "not enough history".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSnapshot {
    pub close: f64,
    pub bb_middle: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub rsi: Option<f64>,
    pub ema_200: Option<f64>,
}

impl IndicatorSnapshot {
    /// True when every indicator has a finite value.
    pub fn is_complete(&self) -> bool {
        self.close.is_finite()
            && [self.bb_middle, self.bb_upper, self.bb_lower, self.rsi, self.ema_200]
                .iter()
                .all(|v| v.is_some_and(f64::is_finite))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPoint {
    #[serde(flatten)]
    pub point: PricePoint,
    pub indicators: IndicatorSnapshot,
}

/// Output of [`compute_indicators`]: the input points with their snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedSeries {
    points: Vec<EnrichedPoint>,
}

impl EnrichedSeries {
    #[cfg(test)]
    pub fn points(&self) -> &[EnrichedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Most recent point whose snapshot is fully defined.
    pub fn latest_complete(&self) -> Option<&EnrichedPoint> {
        self.points.iter().rev().find(|p| p.indicators.is_complete())
    }

    /// The last `n` points (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[EnrichedPoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Attach Bollinger Bands, RSI and EMA-200 to every point of `series`.
///
/// Fails only on an empty series.  Short series yield `None` indicator fields
/// rather than an error.
pub fn compute_indicators(series: &PriceSeries) -> Result<EnrichedSeries, SignalError> {
    if series.is_empty() {
        return Err(SignalError::EmptySeries);
    }

    let closes = series.closes();
    let bands = bollinger::calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_NUM_STD);
    let rsi = rsi::calculate_rsi(&closes, RSI_PERIOD);
    let ema = ema::calculate_ema(&closes, EMA_TREND_SPAN);

    let points = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| EnrichedPoint {
            point: p.clone(),
            indicators: IndicatorSnapshot {
                close: p.close,
                bb_middle: bands[i].map(|b| b.middle),
                bb_upper: bands[i].map(|b| b.upper),
                bb_lower: bands[i].map(|b| b.lower),
                rsi: rsi[i],
                ema_200: ema.get(i).copied().filter(|v| v.is_finite()),
            },
        })
        .collect();

    Ok(EnrichedSeries { points })
}
