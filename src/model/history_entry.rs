//! One row of the calculation history.

/// An `(expression, result)` pair.
///
/// The expression is kept exactly as typed or pasted, before normalization,
/// so the history shows what the user actually entered. The result is either
/// a rendered number or a failure message. Duplicates are legal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryEntry {
    expression: String,
    result: String,
}

impl HistoryEntry {
    /// Create a new entry.
    pub fn new(expression: impl Into<String>, result: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            result: result.into(),
        }
    }

    /// The formula as entered.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The number or failure message shown for the formula.
    pub fn result(&self) -> &str {
        &self.result
    }
}
