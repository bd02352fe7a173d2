// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ).  σ is the *sample* standard deviation of the
// window (divisor `period - 1`).
//
// The signal evaluator compares the latest close against the outer bands.

use serde::Serialize;

/// Bands for a single point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Compute Bollinger Bands for every close.
///
/// The output has the same length as `closes`.  Index `i` is `None` until
/// `period` observations are available (i.e. for `i < period - 1`).
///
/// # Edge cases
/// - `period < 2` => all `None` (sample σ needs two observations)
/// - `closes.len() < period` => all `None`
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerBand>> {
    let mut out = vec![None; closes.len()];
    if period < 2 || closes.len() < period {
        return out;
    }

    let period_f = period as f64;
    for end in period..=closes.len() {
        let window = &closes[end - period..end];
        let middle = window.iter().sum::<f64>() / period_f;
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / (period_f - 1.0);
        let std_dev = variance.sqrt();

        if middle.is_finite() && std_dev.is_finite() {
            out[end - 1] = Some(BollingerBand {
                upper: middle + num_std * std_dev,
                middle,
                lower: middle - num_std * std_dev,
            });
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let bands = calculate_bollinger(&closes, 20, 2.0);
        assert_eq!(bands.len(), 20);
        assert!(bands[..19].iter().all(Option::is_none));

        let bb = bands[19].unwrap();
        assert!((bb.middle - 10.5).abs() < 1e-10);
        // Sample σ of 1..=20 is sqrt(35).
        let sigma = 35.0_f64.sqrt();
        assert!((bb.upper - (10.5 + 2.0 * sigma)).abs() < 1e-10);
        assert!((bb.lower - (10.5 - 2.0 * sigma)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes = vec![1.0; 19];
        let bands = calculate_bollinger(&closes, 20, 2.0);
        assert_eq!(bands.len(), 19);
        assert!(bands.iter().all(Option::is_none));
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 40];
        let bands = calculate_bollinger(&closes, 20, 2.0);
        for bb in bands.iter().flatten() {
            assert_eq!(bb.upper - bb.lower, 0.0);
            assert_eq!(bb.middle, 100.0);
        }
        assert_eq!(bands.iter().flatten().count(), 21);
    }

    #[test]
    fn bollinger_window_slides() {
        let mut closes = vec![10.0; 20];
        closes.push(30.0);
        let bands = calculate_bollinger(&closes, 20, 2.0);
        let last = bands[20].unwrap();
        // Window is nineteen 10s and one 30.
        assert!((last.middle - 11.0).abs() < 1e-10);
        // Squared deviations sum to 19 * 1 + 19^2 = 380, so σ = sqrt(380 / 19).
        let sigma = 20.0_f64.sqrt();
        assert!((last.upper - (11.0 + 2.0 * sigma)).abs() < 1e-10);
    }
}
