// =============================================================================
// Analysis Report — what the dashboard / terminal shows
// =============================================================================
//
// Turns a `SignalResult` plus the enriched series into display-ready pieces:
//
//   - headline signal
//   - two-column checklist (4 BUY criteria, 3 SELL criteria) with the
//     numbers that decided each one
//   - latest metrics (price, F&G, RSI, EMA-200)
//   - chart series for the most recent N points
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;

use crate::indicators::rsi::rsi_zone;
use crate::indicators::{EnrichedPoint, EnrichedSeries};
use crate::signals::{Criterion, CriterionGroup, SignalClass, SignalInputs, SignalResult};
use crate::types::SentimentReading;

#[derive(Debug, Clone, Serialize)]
pub struct ChecklistItem {
    pub criterion: Criterion,
    pub label: &'static str,
    pub passed: bool,
    /// The comparison behind the verdict, e.g. "$95.00 < $96.00".
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Checklist {
    pub buy: Vec<ChecklistItem>,
    pub sell: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Metrics {
    pub last_price: String,
    pub fear_greed: String,
    pub fear_greed_label: String,
    pub rsi_14: String,
    pub rsi_zone: &'static str,
    pub ema_200: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub ema_200: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
}

impl From<&EnrichedPoint> for ChartPoint {
    fn from(p: &EnrichedPoint) -> Self {
        Self {
            date: p.point.date,
            close: p.point.close,
            ema_200: p.indicators.ema_200,
            bb_upper: p.indicators.bb_upper,
            bb_lower: p.indicators.bb_lower,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub as_of: NaiveDate,
    pub headline: String,
    pub signal: SignalResult,
    pub sentiment: SentimentReading,
    pub checklist: Checklist,
    pub metrics: Metrics,
    pub chart: Vec<ChartPoint>,
}

impl AnalysisReport {
    pub fn build(
        ticker: &str,
        as_of: NaiveDate,
        signal: SignalResult,
        sentiment: SentimentReading,
        enriched: &EnrichedSeries,
        chart_points: usize,
    ) -> Self {
        let checklist = build_checklist(&signal);
        let inputs = &signal.inputs;
        let metrics = Metrics {
            last_price: format_usd(inputs.price),
            fear_greed: inputs.sentiment_value.to_string(),
            fear_greed_label: inputs.sentiment_label.clone(),
            rsi_14: format!("{:.2}", inputs.rsi),
            rsi_zone: rsi_zone(inputs.rsi),
            ema_200: format_usd(inputs.ema_200),
        };

        Self {
            ticker: ticker.to_string(),
            as_of,
            headline: headline(signal.classification, ticker),
            checklist,
            metrics,
            chart: enriched.tail(chart_points).iter().map(ChartPoint::from).collect(),
            signal,
            sentiment,
        }
    }
}

fn headline(class: SignalClass, ticker: &str) -> String {
    match class {
        SignalClass::Buy => format!("VALID BUY SIGNAL: {ticker}"),
        SignalClass::Sell => format!("VALID SELL SIGNAL: {ticker}"),
        SignalClass::Hold => "NO SIGNAL (HOLD / NEUTRAL)".to_string(),
    }
}

fn detail(criterion: Criterion, i: &SignalInputs) -> String {
    let sentiment = format!("{} ({})", i.sentiment_value, i.sentiment_label);
    match criterion {
        Criterion::RsiOversold | Criterion::RsiOverbought => format!("{:.2}", i.rsi),
        Criterion::PriceBelowBb => format!("{} < {}", format_usd(i.price), format_usd(i.bb_lower)),
        Criterion::PriceAboveBb => format!("{} > {}", format_usd(i.price), format_usd(i.bb_upper)),
        Criterion::TrendUp => format!("{} > {}", format_usd(i.price), format_usd(i.ema_200)),
        Criterion::SentimentFear | Criterion::SentimentGreed => sentiment,
    }
}

fn build_checklist(signal: &SignalResult) -> Checklist {
    let items = |group: CriterionGroup| {
        Criterion::ALL
            .into_iter()
            .filter(|c| c.group() == group)
            .map(|c| ChecklistItem {
                criterion: c,
                label: c.description(),
                passed: signal.passed(c),
                detail: detail(c, &signal.inputs),
            })
            .collect::<Vec<_>>()
    };
    Checklist {
        buy: items(CriterionGroup::Buy),
        sell: items(CriterionGroup::Sell),
    }
}

/// Format as US dollars with thousands separators: `$12,345.68`.
pub fn format_usd(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{frac_part}")
}

/// Plain-text rendering for one-shot terminal mode.
pub fn render_text(report: &AnalysisReport) -> String {
    let mark = |passed: bool| if passed { "[x]" } else { "[ ]" };
    let mut out = String::new();

    out.push_str(&format!("Analysis for {} as of {}\n\n", report.ticker, report.as_of));
    out.push_str(&format!("SIGNAL: {}\n\n", report.headline));

    for (title, items) in [("BUY criteria", &report.checklist.buy), ("SELL criteria", &report.checklist.sell)] {
        out.push_str(title);
        out.push('\n');
        for (n, item) in items.iter().enumerate() {
            out.push_str(&format!(
                "  {} {}. {}: {}\n",
                mark(item.passed),
                n + 1,
                item.label,
                item.detail
            ));
        }
        out.push('\n');
    }

    let m = &report.metrics;
    out.push_str(&format!("Last price    {}\n", m.last_price));
    out.push_str(&format!("F&G index     {} ({})\n", m.fear_greed, m.fear_greed_label));
    out.push_str(&format!("RSI (14)      {} {}\n", m.rsi_14, m.rsi_zone));
    out.push_str(&format!("Trend EMA 200 {}\n", m.ema_200));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{compute_indicators, IndicatorSnapshot};
    use crate::signals::evaluate_signal;
    use crate::types::series_from_closes;

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(-42.5), "-$42.50");
        assert_eq!(format_usd(100.0), "$100.00");
    }

    fn sample_report() -> AnalysisReport {
        let enriched = compute_indicators(&series_from_closes(&vec![100.0; 250])).unwrap();
        let latest = enriched.latest_complete().unwrap();
        let snapshot: IndicatorSnapshot = latest.indicators;
        let fng = SentimentReading::new(50, "Neutral");
        let signal = evaluate_signal(&snapshot, &fng).unwrap();
        AnalysisReport::build("BTC-USD", latest.point.date, signal, fng, &enriched, 180)
    }

    #[test]
    fn checklist_columns() {
        let report = sample_report();
        assert_eq!(report.checklist.buy.len(), 4);
        assert_eq!(report.checklist.sell.len(), 3);
        assert_eq!(report.checklist.buy[0].criterion, Criterion::RsiOversold);
        assert_eq!(report.checklist.buy[1].detail, "$100.00 < $100.00");
        assert_eq!(report.checklist.buy[3].detail, "50 (Neutral)");
        assert_eq!(report.checklist.sell[0].detail, "50.00");
    }

    #[test]
    fn chart_is_limited_to_tail() {
        let report = sample_report();
        assert_eq!(report.chart.len(), 180);
        assert_eq!(report.chart.last().unwrap().date, report.as_of);
    }

    #[test]
    fn hold_headline_and_metrics() {
        let report = sample_report();
        assert_eq!(report.headline, "NO SIGNAL (HOLD / NEUTRAL)");
        assert_eq!(report.metrics.last_price, "$100.00");
        assert_eq!(report.metrics.rsi_14, "50.00");
        assert_eq!(report.metrics.rsi_zone, "NEUTRAL");
    }

    #[test]
    fn text_rendering_lists_every_criterion() {
        let text = render_text(&sample_report());
        for c in Criterion::ALL {
            assert!(text.contains(c.description()), "missing {c}");
        }
        assert!(text.contains("SIGNAL: NO SIGNAL"));
        assert!(!text.contains("[x]"));
    }

    #[test]
    fn serialises_to_json() {
        let json = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(json["signal"]["classification"], "HOLD");
        assert_eq!(json["signal"]["criteria"]["TREND_UP"], false);
        assert_eq!(json["checklist"]["buy"][2]["criterion"], "TREND_UP");
    }
}
