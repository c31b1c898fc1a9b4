//! User-facing texts.

pub(crate) const DIVISION_BY_ZERO: &str = "Error. Division by 0";
pub(crate) const SYNTAX_ERROR: &str = "Syntax error";
pub(crate) const INVALID_SYMBOL: &str = "Error. Invalid symbol";

/// Texts the shell shows for failures and the clear-history confirmation.
///
/// Failure texts double as the result column of failed history entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Result text for a zero denominator.
    pub division_by_zero: String,
    /// Result text for malformed formulas.
    pub syntax_error: String,
    /// Result text for formulas with disallowed symbols.
    pub invalid_symbol: String,
    /// Prefix of the one-time notice for an unreadable history file.
    pub history_read_error: String,
    /// Prefix of the one-time notice for a failed history save.
    pub history_write_error: String,
    /// Question asked before erasing the history.
    pub clear_question: String,
    /// Answer that erases the history.
    pub clear_accept: String,
    /// Answer that keeps the history.
    pub clear_reject: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            division_by_zero: DIVISION_BY_ZERO.to_string(),
            syntax_error: SYNTAX_ERROR.to_string(),
            invalid_symbol: INVALID_SYMBOL.to_string(),
            history_read_error: "The history file exists but is damaged or unreadable. \
                                 Previous history is not used:"
                .to_string(),
            history_write_error: "Could not write the calculation history to file:".to_string(),
            clear_question: "The entire calculation history will be permanently erased.\n\
                             Do you agree?"
                .to_string(),
            clear_accept: "Yes".to_string(),
            clear_reject: "No".to_string(),
        }
    }
}
