// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha = 2 / (span + 1)
//   EMA_0 = close_0
//   EMA_t = alpha * close_t + (1 - alpha) * EMA_{t-1}
//
// The series is seeded from the first close, so every point has a value.
// Early values lean toward the seed until roughly `span` closes have passed.
// =============================================================================

/// Compute the EMA series for `closes` with the given `span`.
///
/// The output has the same length as `closes`.
///
/// # Edge cases
/// - `span == 0` => empty vec
/// - Once a non-finite value appears, the rest of the series is `NaN`.
pub fn calculate_ema(closes: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || closes.is_empty() {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut result = Vec::with_capacity(closes.len());

    let mut prev = closes[0];
    result.push(prev);
    for &close in &closes[1..] {
        // Same recurrence as above, written so a constant input stays exact.
        let ema = prev + alpha * (close - prev);
        result.push(ema);
        prev = ema;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert!(calculate_ema(&[1.0, 2.0, 3.0], 0).is_empty());
    }

    #[test]
    fn ema_seeded_from_first_close() {
        let ema = calculate_ema(&[42.0, 10.0], 200);
        assert_eq!(ema[0], 42.0);
        assert_eq!(ema.len(), 2);
    }

    #[test]
    fn ema_known_values() {
        // span 5 => alpha = 1/3
        let closes: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 5);
        assert_eq!(ema.len(), 10);

        let alpha = 2.0 / 6.0;
        let mut expected = closes[0];
        for (i, &c) in closes.iter().enumerate().skip(1) {
            expected = alpha * c + (1.0 - alpha) * expected;
            assert!((ema[i] - expected).abs() < 1e-10, "got {}, expected {expected}", ema[i]);
        }
    }

    #[test]
    fn ema_constant_series_is_constant() {
        let ema = calculate_ema(&vec![100.0; 250], 200);
        assert!(ema.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn ema_lags_a_rising_series() {
        let closes: Vec<f64> = (1..=300).map(|x| x as f64).collect();
        let ema = calculate_ema(&closes, 200);
        assert!(ema[299] < closes[299]);
        assert!(ema[299] > closes[0]);
    }

    #[test]
    fn ema_propagates_nan() {
        let ema = calculate_ema(&[1.0, 2.0, f64::NAN, 5.0], 3);
        assert_eq!(ema.len(), 4);
        assert!(ema[2].is_nan());
        assert!(ema[3].is_nan());
    }
}
