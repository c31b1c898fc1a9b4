//! Safe formula evaluation.
//!
//! Formulas are evaluated by a small recursive-descent parser over a closed
//! grammar: numbers, `+ - * / // **`, unary signs, parentheses and the names
//! from the math table in [`functions`]. No host-language evaluation and no
//! identifier resolution happens outside that table.
//!
//! Grammar, lowest to highest precedence:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '//') unary)*
//! unary   := ('+' | '-') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | CONSTANT | FUNCTION '(' expr ')' | '(' expr ')'
//! ```

pub mod format;
pub mod functions;
pub(crate) mod lexer;
pub(crate) mod parser;

use crate::config::CalcConfig;
use crate::model::EvaluationOutcome;
use format::{format_number, FormatRules};
use functions::{lookup, Builtin};
use lexer::Lexer;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;

/// Why a formula did not produce a number.
///
/// Only [`EvalError::DivisionByZero`] has its own outcome; every other
/// variant surfaces as [`EvaluationOutcome::SyntaxError`] and is kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A denominator was zero, or zero was raised to a negative power.
    #[error("division by zero")]
    DivisionByZero,

    /// A character that starts no token.
    #[error("unexpected character {found:?} at position {position}")]
    UnexpectedCharacter {
        /// Byte offset into the formula.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// A digit run that is not a number (`.`, `007`).
    #[error("malformed number {0:?}")]
    MalformedNumber(String),

    /// A name matched the whitelist but has no binding in the math table.
    #[error("unknown name {0:?}")]
    UnknownName(String),

    /// A token where the grammar does not allow one.
    #[error("unexpected {0}")]
    UnexpectedToken(String),

    /// The formula ended in the middle of an expression.
    #[error("unexpected end of formula")]
    UnexpectedEnd,

    /// Nesting deeper than the parser's recursion limit.
    #[error("formula nested deeper than {0} levels")]
    TooDeep(usize),

    /// A function argument outside its mathematical domain.
    #[error("{function}({argument}) is undefined")]
    Domain {
        /// Function name.
        function: &'static str,
        /// The rejected argument.
        argument: f64,
    },

    /// An intermediate or final value is infinite or NaN.
    #[error("result is not a finite number")]
    Overflow,
}

/// Evaluates normalized, whitelisted formulas.
///
/// Holds only read-only tables, so one instance can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct SafeEvaluator {
    names: Regex,
    bindings: HashMap<String, Builtin>,
    format: FormatRules,
}

impl SafeEvaluator {
    /// Build the name table from `config`.
    ///
    /// Configured names without a math binding are left out; formulas using
    /// them fail with a syntax error.
    ///
    /// # Errors
    ///
    /// Only if the name alternation exceeds the regex size limit.
    pub fn new(config: &CalcConfig) -> Result<Self, regex::Error> {
        let mut bindings = HashMap::new();
        for name in &config.function_names {
            match lookup(name) {
                Some(builtin) => {
                    bindings.insert(name.clone(), builtin);
                }
                None => tracing::warn!(%name, "configured name has no math binding"),
            }
        }

        let alternation = config
            .function_names_longest_first()
            .into_iter()
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("|");
        // An empty name list must match nothing, not the empty string.
        let names = if alternation.is_empty() {
            Regex::new(r"^\b\B")?
        } else {
            Regex::new(&format!("^(?:{alternation})"))?
        };

        Ok(Self {
            names,
            bindings,
            format: config.format.clone(),
        })
    }

    /// Evaluate a normalized formula.
    ///
    /// Never panics and never writes to the terminal; every failure is one
    /// of the outcome variants. Whitelist validation is the caller's job.
    pub fn evaluate(&self, formula: &str) -> EvaluationOutcome {
        match self.compute(formula) {
            Ok(value) => EvaluationOutcome::Success(format_number(value, &self.format)),
            Err(EvalError::DivisionByZero) => {
                tracing::debug!(%formula, "division by zero");
                EvaluationOutcome::DivisionByZero
            }
            Err(reason) => {
                tracing::debug!(%formula, %reason, "formula rejected");
                EvaluationOutcome::SyntaxError
            }
        }
    }

    /// How results are rendered.
    pub fn format_rules(&self) -> &FormatRules {
        &self.format
    }

    /// Evaluate to the raw floating-point value.
    pub fn compute(&self, formula: &str) -> Result<f64, EvalError> {
        let tokens = Lexer::new(formula, &self.names, &self.bindings).tokenize()?;
        let expr = parser::parse(&tokens)?;
        let value = expr.eval()?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(EvalError::Overflow)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> SafeEvaluator {
        SafeEvaluator::new(&CalcConfig::default()).unwrap()
    }

    fn ok(formula: &str) -> String {
        match evaluator().evaluate(formula) {
            EvaluationOutcome::Success(v) => v,
            other => panic!("{formula} gave {other:?}"),
        }
    }

    #[test]
    fn arithmetic() {
        assert_eq!(ok("2+3*4"), "14");
        assert_eq!(ok("(2+3)*4"), "20");
        assert_eq!(ok("7/2"), "3.5");
        assert_eq!(ok("7//2"), "3");
        assert_eq!(ok("-7//2"), "-4");
        assert_eq!(ok("2**10"), "1024");
        assert_eq!(ok("2**3**2"), "512");
        assert_eq!(ok("-2**2"), "-4");
        assert_eq!(ok("2**-1"), "0.5");
        assert_eq!(ok("1.5+23"), "24.5");
    }

    #[test]
    fn functions_and_constants() {
        assert_eq!(ok("sqrt(16)"), "4");
        assert_eq!(ok("abs(-3)"), "3");
        assert_eq!(ok("log10(1000)"), "3");
        assert_eq!(ok("abs(-2.5)*2"), "5");
        assert_eq!(ok("2*pi").parse::<f64>().unwrap(), 2.0 * std::f64::consts::PI);
    }

    #[test]
    fn division_by_zero() {
        let e = evaluator();
        assert_eq!(e.evaluate("1/0"), EvaluationOutcome::DivisionByZero);
        assert_eq!(e.evaluate("5//0"), EvaluationOutcome::DivisionByZero);
        assert_eq!(e.evaluate("1/(2-2)"), EvaluationOutcome::DivisionByZero);
        assert_eq!(e.evaluate("0**-1"), EvaluationOutcome::DivisionByZero);
    }

    #[test]
    fn syntax_errors() {
        let e = evaluator();
        for formula in [
            "", "1+", "(1", "1)", "()", "sin", "sin*", "pi(2)", "2(3)", "sqrt(-1)", "log(0)",
            "1e999", "10**400", "007", "3**", "//2", "1+*2",
        ] {
            assert_eq!(
                e.evaluate(formula),
                EvaluationOutcome::SyntaxError,
                "{formula:?}"
            );
        }
    }

    #[test]
    fn deep_nesting_is_a_syntax_error_not_a_crash() {
        let deep = "(".repeat(10_000) + "1" + &")".repeat(10_000);
        assert_eq!(evaluator().evaluate(&deep), EvaluationOutcome::SyntaxError);
        let minus = "-".repeat(10_000) + "1";
        assert_eq!(evaluator().evaluate(&minus), EvaluationOutcome::SyntaxError);
    }

    #[test]
    fn moderate_nesting_evaluates() {
        let nested = "(".repeat(100) + "1" + &")".repeat(100);
        assert_eq!(ok(&nested), "1");
    }

    #[test]
    fn unbound_configured_name_is_a_syntax_error() {
        let config = CalcConfig {
            function_names: vec!["exp".to_string(), "pi".to_string()],
            ..CalcConfig::default()
        };
        let e = SafeEvaluator::new(&config).unwrap();
        assert_eq!(e.evaluate("exp(1)"), EvaluationOutcome::SyntaxError);
        assert!(e.evaluate("pi").is_success());
    }

    #[test]
    fn empty_name_table_rejects_names() {
        let config = CalcConfig {
            function_names: Vec::new(),
            ..CalcConfig::default()
        };
        let e = SafeEvaluator::new(&config).unwrap();
        assert_eq!(e.evaluate("pi"), EvaluationOutcome::SyntaxError);
        assert_eq!(e.evaluate("1+1"), EvaluationOutcome::Success("2".into()));
    }

    #[test]
    fn compute_reports_reason() {
        let e = evaluator();
        assert!(matches!(e.compute("sqrt(-4)"), Err(EvalError::Domain { function: "sqrt", .. })));
        assert_eq!(e.compute("1+"), Err(EvalError::UnexpectedEnd));
    }
}
