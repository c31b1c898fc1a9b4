//! A submitted formula together with its outcome.

use super::EvaluationOutcome;

/// What one submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calculation {
    /// The formula exactly as submitted, before normalization.
    pub expression: String,
    /// How evaluating it went.
    pub outcome: EvaluationOutcome,
}
