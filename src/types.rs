// =============================================================================
// Shared types used across the Clarity Signal engine
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SignalError;

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Chronologically ascending price history with unique dates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series, rejecting any pair of points whose dates are not
    /// strictly increasing.
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SignalError> {
        if let Some(i) = points.windows(2).position(|w| w[1].date <= w[0].date) {
            return Err(SignalError::UnorderedSeries { index: i + 1 });
        }
        Ok(Self { points })
    }

    /// Sort by date and keep the last point seen for each date.
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Result<Self, SignalError> {
        // Stable sort keeps arrival order within a date, so the later
        // duplicate is the one that survives.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }
        Self::new(deduped)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Latest settled Fear & Greed reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReading {
    /// Index value in [0, 100].
    pub value: u8,
    /// Provider label, e.g. "Extreme Fear", "Greed".
    pub classification: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

impl SentimentReading {
    pub fn new(value: u8, classification: impl Into<String>) -> Self {
        Self {
            value,
            classification: classification.into(),
            date: None,
        }
    }
}

impl std::fmt::Display for SentimentReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.value, self.classification)
    }
}

/// Build a daily series from closes, starting at 2024-01-01.  Test helper.
#[cfg(test)]
pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint {
            date: start + chrono::Duration::days(i as i64),
            open: c,
            high: c,
            low: c,
            close: c,
            volume: 1_000.0,
        })
        .collect();
    PriceSeries::new(points).unwrap()
}
