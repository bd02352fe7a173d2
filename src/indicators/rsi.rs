// =============================================================================
// Relative Strength Index (RSI) — simple rolling averages
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Split each delta into gain = max(d, 0) and loss = max(-d, 0).
// Step 3 — avg_gain / avg_loss = plain mean over the trailing `period` deltas
//          (no Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Thresholds:  RSI > 70 => OVERBOUGHT,  RSI < 30 => OVERSOLD.
// =============================================================================

/// Compute RSI aligned to `closes`.
///
/// Index `i` is `None` while fewer than `period` deltas exist, so the first
/// `period` entries are always `None` and the first value lands at index
/// `period`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - If average loss is zero (no down moves), RSI is 100.0.
/// - If both averages are zero (flat window), RSI is 50.0.
/// - Non-finite results stay `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let deltas: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();
    let period_f = period as f64;

    // deltas[j] is the change into closes[j + 1].
    for end in period..=deltas.len() {
        let (sum_gain, sum_loss) = deltas[end - period..end]
            .iter()
            .fold((0.0_f64, 0.0_f64), |(g, l), &d| {
                if d > 0.0 {
                    (g + d, l)
                } else {
                    (g, l - d)
                }
            });

        out[end] = rsi_from_averages(sum_gain / period_f, sum_loss / period_f);
    }

    out
}

/// Label an RSI value the way the checklist reads it.
pub fn rsi_zone(value: f64) -> &'static str {
    if value > 70.0 {
        "OVERBOUGHT"
    } else if value < 30.0 {
        "OVERSOLD"
    } else {
        "NEUTRAL"
    }
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // No movement at all — neutral.
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}
