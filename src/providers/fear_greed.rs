// =============================================================================
// Crypto Fear & Greed Index provider (alternative.me)
// =============================================================================
//
// GET {base}/fng/?limit=2 returns the two most recent daily readings, newest
// first.  Index 0 is today's value, which is still moving until the day
// closes; index 1 is yesterday's settled value, which is what the signal uses.
//
//   { "data": [ { "value": "40", "value_classification": "Fear",
//                 "timestamp": "1551157200" }, ... ],
//     "metadata": { "error": null } }
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tracing::{debug, instrument};

use super::cache::Cache;
use super::SentimentProvider;
use crate::error::SignalError;
use crate::types::SentimentReading;

const PROVIDER: &str = "fear_greed";
const CACHE_KEY: &str = "fng:latest";

pub struct FearGreedProvider {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<dyn Cache<SentimentReading>>,
    ttl: Duration,
}

impl FearGreedProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        cache: Arc<dyn Cache<SentimentReading>>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
            ttl,
        }
    }
}

#[async_trait]
impl SentimentProvider for FearGreedProvider {
    #[instrument(skip(self), name = "fear_greed::fetch_sentiment")]
    async fn fetch_sentiment(&self) -> Result<SentimentReading, SignalError> {
        if let Some(reading) = self.cache.get(CACHE_KEY) {
            debug!(value = reading.value, "sentiment served from cache");
            return Ok(reading);
        }

        let url = format!("{}/fng/", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("limit", "2")])
            .send()
            .await
            .map_err(|e| SignalError::upstream(PROVIDER, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SignalError::upstream(PROVIDER, format!("HTTP {status}")));
        }
        let body: Value = resp
            .json()
            .await
            .map_err(|e| SignalError::upstream(PROVIDER, format!("invalid JSON body: {e}")))?;

        let reading = parse_settled_reading(&body)?;
        debug!(
            value = reading.value,
            classification = %reading.classification,
            "sentiment fetched"
        );
        self.cache.put(CACHE_KEY.to_string(), reading.clone(), self.ttl);
        Ok(reading)
    }
}

/// Extract yesterday's settled reading (`data[1]`) from an API body.
pub fn parse_settled_reading(body: &Value) -> Result<SentimentReading, SignalError> {
    if let Some(err) = body.pointer("/metadata/error").and_then(Value::as_str) {
        return Err(SignalError::upstream(PROVIDER, err));
    }

    let data = body
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| SignalError::upstream(PROVIDER, "response has no data array"))?;
    let entry = data.get(1).ok_or_else(|| {
        SignalError::upstream(
            PROVIDER,
            format!("expected two readings, got {}", data.len()),
        )
    })?;

    let value = number_field(entry, "value")
        .filter(|v| (0..=100).contains(v))
        .ok_or_else(|| SignalError::upstream(PROVIDER, format!("invalid value: {}", entry["value"])))?;
    let classification = entry["value_classification"]
        .as_str()
        .ok_or_else(|| SignalError::upstream(PROVIDER, "missing value_classification"))?
        .to_string();
    let date = number_field(entry, "timestamp")
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.date_naive());

    Ok(SentimentReading {
        date,
        ..SentimentReading::new(value as u8, classification)
    })
}

/// The API sends numbers as strings; accept either form.
fn number_field(entry: &Value, key: &str) -> Option<i64> {
    match &entry[key] {
        Value::String(s) => s.trim().parse().ok(),
        v => v.as_i64(),
    }
}
