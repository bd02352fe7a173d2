pub mod criteria;
pub mod evaluator;

pub use criteria::{Criterion, CriterionGroup};
pub use evaluator::{evaluate_signal, SignalClass, SignalInputs, SignalResult};
