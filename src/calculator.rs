//! The normalize → validate → evaluate pipeline behind one handle.

use crate::clipboard::{ClipboardFilter, ClipboardPayload};
use crate::config::CalcConfig;
use crate::evaluator::format::round_result;
use crate::evaluator::SafeEvaluator;
use crate::model::{Calculation, EvaluationOutcome, RoundError};
use crate::normalizer::Normalizer;
use crate::whitelist::WhitelistValidator;
use std::sync::LazyLock;

static SHARED: LazyLock<Calculator> = LazyLock::new(|| {
    Calculator::new(&CalcConfig::default()).expect("built-in grammar tables compile")
});

/// Normalizer, whitelist and evaluator built from one [`CalcConfig`].
///
/// Immutable after construction and `Sync`; share it freely.
#[derive(Debug, Clone)]
pub struct Calculator {
    normalizer: Normalizer,
    validator: WhitelistValidator,
    evaluator: SafeEvaluator,
}

impl Calculator {
    /// Build every stage from `config`.
    ///
    /// # Errors
    ///
    /// If a compiled pattern exceeds the regex size limit.
    pub fn new(config: &CalcConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            normalizer: Normalizer::new(config),
            validator: WhitelistValidator::new(config)?,
            evaluator: SafeEvaluator::new(config)?,
        })
    }

    /// Process-wide instance over the built-in tables, built on first use.
    pub fn shared() -> &'static Calculator {
        &SHARED
    }

    /// See [`Normalizer::normalize`].
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    /// See [`WhitelistValidator::is_valid`].
    pub fn is_valid(&self, normalized: &str) -> bool {
        self.validator.is_valid(normalized)
    }

    /// See [`WhitelistValidator::extract_safe`].
    pub fn extract_safe(&self, normalized: &str) -> String {
        self.validator.extract_safe(normalized)
    }

    /// See [`SafeEvaluator::evaluate`]. Does not validate.
    pub fn evaluate(&self, normalized: &str) -> EvaluationOutcome {
        self.evaluator.evaluate(normalized)
    }

    /// Clipboard filter over this calculator's stages.
    pub fn clipboard(&self) -> ClipboardFilter<'_> {
        ClipboardFilter::new(&self.normalizer, &self.validator)
    }

    /// See [`ClipboardFilter::filter_paste`].
    pub fn filter_paste(&self, raw: &str) -> String {
        self.clipboard().filter_paste(raw)
    }

    /// See [`ClipboardFilter::filter_payload`].
    pub fn filter_payload(&self, payload: ClipboardPayload) -> ClipboardPayload {
        self.clipboard().filter_payload(payload)
    }

    /// Round a rendered result with this calculator's format rules.
    ///
    /// # Errors
    ///
    /// See [`round_result`].
    pub fn round_result(&self, result: &str, digits: u32) -> Result<String, RoundError> {
        round_result(result, digits, self.evaluator.format_rules())
    }

    /// Run a raw submission through the whole pipeline.
    ///
    /// A formula that fails the whitelist is never evaluated.
    pub fn calculate(&self, raw: &str) -> Calculation {
        let normalized = self.normalize(raw);
        let outcome = if self.is_valid(&normalized) {
            self.evaluate(&normalized)
        } else {
            tracing::debug!(%normalized, "rejected by whitelist");
            EvaluationOutcome::InvalidSymbol
        };
        Calculation {
            expression: raw.to_string(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calculate_keeps_raw_expression() {
        let calc = Calculator::shared().calculate("1,5 + 2_3");
        assert_eq!(calc.expression, "1,5 + 2_3");
        assert_eq!(calc.outcome, EvaluationOutcome::Success("24.5".into()));
    }

    #[test]
    fn invalid_symbols_are_never_evaluated() {
        let calc = Calculator::shared();
        assert_eq!(
            calc.calculate("__import__('os')").outcome,
            EvaluationOutcome::InvalidSymbol
        );
        assert_eq!(calc.calculate("2+2#").outcome, EvaluationOutcome::InvalidSymbol);
    }

    #[test]
    fn whitelisted_but_malformed_is_a_syntax_error() {
        let calc = Calculator::shared();
        assert_eq!(calc.calculate("sinx").outcome, EvaluationOutcome::SyntaxError);
        assert_eq!(calc.calculate("").outcome, EvaluationOutcome::SyntaxError);
    }

    #[test]
    fn shared_is_built_once() {
        assert!(std::ptr::eq(Calculator::shared(), Calculator::shared()));
    }

    #[test]
    fn custom_config_changes_the_grammar() {
        let config = CalcConfig {
            function_names: vec!["pi".to_string()],
            ..CalcConfig::default()
        };
        let calc = Calculator::new(&config).unwrap();
        assert_eq!(calc.calculate("sqrt(4)").outcome, EvaluationOutcome::InvalidSymbol);
        assert!(calc.calculate("2*pi").outcome.is_success());
    }
}
