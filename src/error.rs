// =============================================================================
// Domain errors
// =============================================================================
//
// Every failure the analysis pipeline can surface to a caller.  The indicator
// engine and the signal evaluator never substitute defaults for missing data;
// they return one of these and let the presentation layer decide what to show.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// The price provider returned no usable rows.
    #[error("price series is empty")]
    EmptySeries,

    /// Dates are not strictly increasing at `index`.
    #[error("price series is not strictly ascending at index {index}")]
    UnorderedSeries { index: usize },

    /// No point in the series has every indicator warmed up.
    #[error("insufficient history: need at least {required} points, got {available}")]
    InsufficientHistory { required: usize, available: usize },

    /// The evaluator was handed a snapshot with a null or non-finite field.
    #[error("indicator snapshot is missing `{field}`")]
    IncompleteInput { field: &'static str },

    /// A data provider failed.  Never retried by the core.
    #[error("{provider} fetch failed: {reason}")]
    UpstreamFetch { provider: String, reason: String },

    /// Empty, too long, or outside `A-Z 0-9 . ^ = -`.
    #[error("invalid ticker: expected up to 20 characters of A-Z, 0-9 and . ^ = -")]
    InvalidTicker,
}

impl SignalError {
    pub fn upstream(provider: impl Into<String>, reason: impl ToString) -> Self {
        Self::UpstreamFetch {
            provider: provider.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable machine-readable name used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptySeries => "empty_series",
            Self::UnorderedSeries { .. } => "unordered_series",
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::IncompleteInput { .. } => "incomplete_input",
            Self::UpstreamFetch { .. } => "upstream_fetch",
            Self::InvalidTicker => "invalid_ticker",
        }
    }
}
