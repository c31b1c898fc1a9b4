//! The closed set of results an evaluation attempt can produce.

use crate::model::Messages;
use std::fmt;

/// Result of evaluating one formula.
///
/// Exactly one variant per attempt; evaluation never partially succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EvaluationOutcome {
    /// The formula evaluated to a number, already rendered as a string.
    Success(String),
    /// A denominator was zero (`1/0`, `1//0`, `0**-1`).
    DivisionByZero,
    /// Malformed formula, math domain error or non-finite result.
    SyntaxError,
    /// The normalized formula contains characters or names outside the whitelist.
    InvalidSymbol,
}

impl EvaluationOutcome {
    /// Whether the formula produced a number.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The rendered number, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Success(value) => Some(value),
            _ => None,
        }
    }

    /// Text shown to the user in place of (or as) the result.
    pub fn message<'a>(&'a self, messages: &'a Messages) -> &'a str {
        match self {
            Self::Success(value) => value,
            Self::DivisionByZero => &messages.division_by_zero,
            Self::SyntaxError => &messages.syntax_error,
            Self::InvalidSymbol => &messages.invalid_symbol,
        }
    }
}

impl fmt::Display for EvaluationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => f.write_str(value),
            Self::DivisionByZero => f.write_str(super::messages::DIVISION_BY_ZERO),
            Self::SyntaxError => f.write_str(super::messages::SYNTAX_ERROR),
            Self::InvalidSymbol => f.write_str(super::messages::INVALID_SYMBOL),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_exposes_value() {
        let outcome = EvaluationOutcome::Success("24.5".to_string());
        assert!(outcome.is_success());
        assert_eq!(outcome.value(), Some("24.5"));
        assert_eq!(outcome.to_string(), "24.5");
    }

    #[test]
    fn failures_have_no_value() {
        for outcome in [
            EvaluationOutcome::DivisionByZero,
            EvaluationOutcome::SyntaxError,
            EvaluationOutcome::InvalidSymbol,
        ] {
            assert!(!outcome.is_success());
            assert_eq!(outcome.value(), None);
        }
    }

    #[test]
    fn message_uses_configured_texts() {
        let messages = Messages {
            division_by_zero: "Ошибка. Деление на 0".to_string(),
            ..Messages::default()
        };
        assert_eq!(
            EvaluationOutcome::DivisionByZero.message(&messages),
            "Ошибка. Деление на 0"
        );
        assert_eq!(
            EvaluationOutcome::SyntaxError.message(&messages),
            Messages::default().syntax_error
        );
    }

    #[test]
    fn display_matches_default_messages() {
        let defaults = Messages::default();
        assert_eq!(
            EvaluationOutcome::InvalidSymbol.to_string(),
            defaults.invalid_symbol
        );
        assert_eq!(
            EvaluationOutcome::DivisionByZero.to_string(),
            defaults.division_by_zero
        );
    }
}
