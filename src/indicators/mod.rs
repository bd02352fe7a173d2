// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators behind the signal
// checklist.  Every series function returns one entry per input close so the
// engine can zip them back onto the price points; entries without enough
// history are `None`.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod rsi;

pub use engine::{compute_indicators, EnrichedPoint, EnrichedSeries, IndicatorSnapshot};
