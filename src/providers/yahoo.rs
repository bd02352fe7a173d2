// =============================================================================
// Yahoo Finance daily price provider
// =============================================================================
//
// GET {base}/v8/finance/chart/{symbol}?period1=..&period2=..&interval=1d
//
// The response is column-oriented:
//
//   chart.result[0].timestamp              [t0, t1, ...]           (unix s)
//   chart.result[0].meta.gmtoffset         exchange offset         (s)
//   chart.result[0].indicators.quote[0]    { open: [...], close: [...], ... }
//
// The symbol is pushed as a single percent-encoded path segment.  Column names
// are normalised (lower-case, spaces => underscores) before they are mapped
// onto `PricePoint` fields.  Rows with a missing timestamp or OHLC value are
// dropped; rows are then sorted and de-duplicated by date.
// =============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::cache::Cache;
use super::{normalize_column, PriceProvider};
use crate::error::SignalError;
use crate::types::{PricePoint, PriceSeries};

const PROVIDER: &str = "yahoo_finance";

pub struct YahooPriceProvider {
    client: reqwest::Client,
    base_url: String,
    cache: Arc<dyn Cache<PriceSeries>>,
    ttl: Duration,
}

impl YahooPriceProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        cache: Arc<dyn Cache<PriceSeries>>,
        ttl: Duration,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
            ttl,
        }
    }

    fn cache_key(symbol: &str, lookback_days: u32) -> String {
        format!("prices:{symbol}:{lookback_days}")
    }

    fn chart_url(&self, symbol: &str) -> Result<Url, SignalError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| SignalError::upstream(PROVIDER, format!("invalid base url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SignalError::upstream(PROVIDER, "base url cannot take a path"))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(symbol);
        Ok(url)
    }

    async fn download(&self, symbol: &str, lookback_days: u32) -> Result<Value, SignalError> {
        let end = Utc::now();
        let start = end - chrono::Duration::days(i64::from(lookback_days));
        let url = self.chart_url(symbol)?;

        let resp = self
            .client
            .get(url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| SignalError::upstream(PROVIDER, e))?;

        let status = resp.status();
        let text = resp.text().await;
        if !status.is_success() {
            return Err(status_error(status, text.as_deref().unwrap_or_default()));
        }
        let text = text.map_err(|e| SignalError::upstream(PROVIDER, e))?;

        serde_json::from_str(&text)
            .map_err(|e| SignalError::upstream(PROVIDER, format!("invalid JSON body: {e}")))
    }
}

/// Yahoo reports unknown symbols as 404 with a JSON error payload; prefer its
/// description, and fall back to the bare status for anything else.
fn status_error(status: StatusCode, text: &str) -> SignalError {
    let reason = serde_json::from_str::<Value>(text)
        .ok()
        .and_then(|body| chart_error(&body))
        .unwrap_or_else(|| format!("HTTP {status}"));
    SignalError::upstream(PROVIDER, reason)
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    #[instrument(skip(self), name = "yahoo::fetch_prices")]
    async fn fetch_prices(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, SignalError> {
        let key = Self::cache_key(symbol, lookback_days);
        if let Some(series) = self.cache.get(&key) {
            debug!(symbol, points = series.len(), "price history served from cache");
            return Ok(series);
        }

        let body = self.download(symbol, lookback_days).await?;
        let series = parse_chart(&body)?;

        debug!(symbol, points = series.len(), "price history fetched");
        self.cache.put(key, series.clone(), self.ttl);
        Ok(series)
    }
}

fn chart_error(body: &Value) -> Option<String> {
    let err = body.pointer("/chart/error").filter(|e| !e.is_null())?;
    let description = err["description"].as_str().or_else(|| err["code"].as_str())?;
    Some(description.to_string())
}

/// Parse a chart API body into a `PriceSeries`.
pub fn parse_chart(body: &Value) -> Result<PriceSeries, SignalError> {
    if let Some(reason) = chart_error(body) {
        return Err(SignalError::upstream(PROVIDER, reason));
    }

    let result = body
        .pointer("/chart/result/0")
        .ok_or_else(|| SignalError::upstream(PROVIDER, "response has no chart result"))?;

    // Nulls keep their slot so every row stays aligned with the quote columns.
    let timestamps: Vec<Option<i64>> = match result.get("timestamp").and_then(Value::as_array) {
        Some(ts) => ts.iter().map(Value::as_i64).collect(),
        // A valid symbol with no trading days in range has no timestamp key.
        None => return Err(SignalError::EmptySeries),
    };
    let gmtoffset = result.pointer("/meta/gmtoffset").and_then(Value::as_i64).unwrap_or(0);

    let quote = result
        .pointer("/indicators/quote/0")
        .and_then(Value::as_object)
        .ok_or_else(|| SignalError::upstream(PROVIDER, "response has no quote block"))?;

    let columns: HashMap<String, &Vec<Value>> = quote
        .iter()
        .filter_map(|(name, v)| v.as_array().map(|arr| (normalize_column(name), arr)))
        .collect();

    let column = |name: &'static str| {
        columns
            .get(name)
            .copied()
            .ok_or_else(|| SignalError::upstream(PROVIDER, format!("missing `{name}` column")))
    };
    let open = column("open")?;
    let high = column("high")?;
    let low = column("low")?;
    let close = column("close")?;
    let volume = columns.get("volume").copied();

    let cell = |col: &Vec<Value>, i: usize| col.get(i).and_then(Value::as_f64);

    let mut points = Vec::with_capacity(timestamps.len());
    let mut dropped = 0usize;
    for (i, ts) in timestamps.iter().enumerate() {
        let row = (cell(open, i), cell(high, i), cell(low, i), cell(close, i));
        let (Some(o), Some(h), Some(l), Some(c)) = row else {
            dropped += 1;
            continue;
        };
        let Some(date) = ts.and_then(|t| to_date(t + gmtoffset)) else {
            dropped += 1;
            continue;
        };
        points.push(PricePoint {
            date,
            open: o,
            high: h,
            low: l,
            close: c,
            volume: volume.and_then(|v| cell(v, i)).unwrap_or(0.0),
        });
    }

    if dropped > 0 {
        warn!(dropped, "skipped incomplete price rows");
    }
    if points.is_empty() {
        return Err(SignalError::EmptySeries);
    }

    PriceSeries::from_unsorted(points)
}

fn to_date(unix_secs: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(unix_secs, 0).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::cache::TtlCache;
    use serde_json::json;

    // 2024-01-01T00:00:00Z
    const DAY0: i64 = 1_704_067_200;
    const DAY: i64 = 86_400;

    fn body(ts: Vec<i64>, quote: Value) -> Value {
        json!({
            "chart": {
                "result": [{
                    "meta": { "symbol": "BTC-USD", "gmtoffset": 0 },
                    "timestamp": ts,
                    "indicators": { "quote": [quote] }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn parses_rows_in_order() {
        let b = body(
            vec![DAY0, DAY0 + DAY],
            json!({
                "open": [1.0, 2.0], "high": [1.5, 2.5], "low": [0.5, 1.5],
                "close": [1.2, 2.2], "volume": [10, 20]
            }),
        );
        let series = parse_chart(&b).unwrap();
        assert_eq!(series.len(), 2);
        let first = &series.points()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.close, 1.2);
        assert_eq!(first.volume, 10.0);
    }

    #[test]
    fn normalises_column_names() {
        let b = body(
            vec![DAY0],
            json!({ "Open": [1.0], "High": [1.0], "Low": [1.0], "Close": [3.0], "Adj Close": [2.9] }),
        );
        let series = parse_chart(&b).unwrap();
        assert_eq!(series.points()[0].close, 3.0);
        assert_eq!(series.points()[0].volume, 0.0);
    }

    #[test]
    fn drops_rows_with_nulls_and_sorts() {
        let b = body(
            vec![DAY0 + 2 * DAY, DAY0, DAY0 + DAY],
            json!({
                "open": [3.0, 1.0, null], "high": [3.0, 1.0, 2.0], "low": [3.0, 1.0, 2.0],
                "close": [3.0, 1.0, 2.0], "volume": [0, 0, 0]
            }),
        );
        let series = parse_chart(&b).unwrap();
        assert_eq!(series.closes(), vec![1.0, 3.0]);
    }

    #[test]
    fn chart_error_is_upstream() {
        let b = json!({
            "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" } }
        });
        let err = parse_chart(&b).unwrap_err();
        assert_eq!(
            err,
            SignalError::upstream(PROVIDER, "No data found, symbol may be delisted")
        );
    }

    #[test]
    fn no_rows_is_empty_series() {
        let b = json!({ "chart": { "result": [{ "meta": {}, "indicators": { "quote": [{}] } }], "error": null } });
        assert_eq!(parse_chart(&b).unwrap_err(), SignalError::EmptySeries);

        let b = body(
            vec![DAY0],
            json!({ "open": [null], "high": [null], "low": [null], "close": [null] }),
        );
        assert_eq!(parse_chart(&b).unwrap_err(), SignalError::EmptySeries);
    }

    #[test]
    fn missing_close_column_is_upstream() {
        let b = body(vec![DAY0], json!({ "open": [1.0], "high": [1.0], "low": [1.0] }));
        assert!(matches!(parse_chart(&b), Err(SignalError::UpstreamFetch { .. })));
    }

    #[test]
    fn null_timestamp_drops_only_its_row() {
        let mut b = body(
            vec![],
            json!({
                "open": [1.0, 2.0, 3.0], "high": [1.0, 2.0, 3.0], "low": [1.0, 2.0, 3.0],
                "close": [1.0, 2.0, 3.0]
            }),
        );
        b["chart"]["result"][0]["timestamp"] = json!([DAY0, null, DAY0 + 2 * DAY]);

        let series = parse_chart(&b).unwrap();
        assert_eq!(series.closes(), vec![1.0, 3.0]);
        assert_eq!(
            series.points()[1].date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    fn provider(base: &str) -> YahooPriceProvider {
        YahooPriceProvider::new(
            reqwest::Client::new(),
            base,
            Arc::new(TtlCache::<PriceSeries>::new()),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn chart_url_encodes_the_symbol_as_one_segment() {
        let p = provider("http://127.0.0.1:9/");
        let url = p.chart_url("BTC-USD").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9/v8/finance/chart/BTC-USD");

        let url = p.chart_url("BTC-USD#X").unwrap();
        assert_eq!(url.path(), "/v8/finance/chart/BTC-USD%23X");
        assert_eq!(url.fragment(), None);

        let url = p.chart_url("X/../v7/finance/quote?interval=1wk").unwrap();
        assert_eq!(url.path_segments().map(|s| s.count()), Some(4));
        assert!(url.path().starts_with("/v8/finance/chart/X%2F"));
        assert_eq!(url.query(), None);
    }

    #[test]
    fn non_json_error_status_keeps_the_status() {
        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "<html>slow down</html>");
        assert_eq!(err, SignalError::upstream(PROVIDER, "HTTP 429 Too Many Requests"));
    }

    #[test]
    fn json_error_status_uses_the_description() {
        let text = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found"}}}"#;
        let err = status_error(StatusCode::NOT_FOUND, text);
        assert_eq!(err, SignalError::upstream(PROVIDER, "No data found"));
    }

    #[tokio::test]
    async fn cached_series_skips_the_network() {
        let cache = Arc::new(TtlCache::<PriceSeries>::new());
        let series = crate::types::series_from_closes(&[1.0, 2.0]);
        cache.put("prices:BTC-USD:300".into(), series.clone(), Duration::from_secs(60));

        // Unroutable base URL: any network access would fail the test.
        let provider = YahooPriceProvider::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            cache,
            Duration::from_secs(60),
        );
        let got = provider.fetch_prices("BTC-USD", 300).await.unwrap();
        assert_eq!(got, series);
    }
}
