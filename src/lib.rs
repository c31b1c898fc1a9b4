//! safecalc
//!
//! A calculator core for untrusted formula text: normalize locale and typo
//! variants, validate against a whitelist grammar, evaluate with a
//! purpose-built parser, and keep a newest-first history that round-trips
//! through a spreadsheet-friendly CSV file.
//!
//! The free functions below run on a process-wide [`Calculator`] built from
//! the default tables. Build your own `Calculator` from a custom
//! [`config::CalcConfig`] to change the grammar.

pub mod calculator;
pub mod clipboard;
pub mod config;
pub mod evaluator;
pub mod history;
pub mod logging;
pub mod model;
pub mod normalizer;
pub mod session;
pub mod whitelist;

pub use calculator::Calculator;
pub use clipboard::ClipboardPayload;
pub use history::HistoryLog;
pub use model::{Calculation, EvaluationOutcome, HistoryEntry};
pub use session::{ClearPrompt, Confirm, Session};

/// Rewrite locale and typo variants into canonical characters.
pub fn normalize(raw: &str) -> String {
    Calculator::shared().normalize(raw)
}

/// Whether a normalized formula consists only of whitelisted tokens.
pub fn is_valid(normalized: &str) -> bool {
    Calculator::shared().is_valid(normalized)
}

/// Keep only the whitelisted pieces of a normalized string.
pub fn extract_safe(normalized: &str) -> String {
    Calculator::shared().extract_safe(normalized)
}

/// Evaluate a normalized formula. Does not check the whitelist.
pub fn evaluate(normalized: &str) -> EvaluationOutcome {
    Calculator::shared().evaluate(normalized)
}

/// Normalize pasted text and drop everything outside the whitelist.
pub fn filter_paste(raw: &str) -> String {
    Calculator::shared().filter_paste(raw)
}

#[cfg(test)]
mod tests;
