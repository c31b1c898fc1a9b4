//! One calculator run: history loaded at start, saved at the end.
//!
//! The session is what a front end drives. It owns the history log, records
//! every submission (failed ones too, with their message as the result) and
//! gates clearing behind a [`Confirm`] answer. Persistence failures come back
//! as values; the session keeps working on its in-memory log either way.

use crate::calculator::Calculator;
use crate::config::ResolvedConfig;
use crate::history::HistoryLog;
use crate::model::{
    Calculation, HistoryEntry, HistoryReadError, HistoryWriteError, Messages, RoundError,
};
use std::path::{Path, PathBuf};

/// Texts of the clear-history confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearPrompt<'a> {
    /// The question.
    pub question: &'a str,
    /// Label of the answer that erases the history.
    pub accept: &'a str,
    /// Label of the answer that keeps it.
    pub reject: &'a str,
}

/// Asks the user a yes/no question.
pub trait Confirm {
    /// `true` to proceed.
    fn confirm(&self, prompt: &ClearPrompt<'_>) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&ClearPrompt<'_>) -> bool,
{
    fn confirm(&self, prompt: &ClearPrompt<'_>) -> bool {
        self(prompt)
    }
}

/// A running calculator with its history.
#[derive(Debug)]
pub struct Session {
    calculator: Calculator,
    history: HistoryLog,
    history_path: PathBuf,
    history_header: (String, String),
    messages: Messages,
    round_digits: u32,
}

impl Session {
    /// Load the history file named by `config` and start a session.
    ///
    /// A history file that exists but cannot be read is returned next to a
    /// session with an empty log, for the caller to report once.
    pub fn start(
        calculator: Calculator,
        config: &ResolvedConfig,
    ) -> (Self, Option<HistoryReadError>) {
        let (history, error) = match HistoryLog::load(&config.history_file) {
            Ok(history) => (history, None),
            Err(e) => {
                tracing::warn!(error = %e, "history not loaded, starting empty");
                (HistoryLog::new(), Some(e))
            }
        };

        let session = Self {
            calculator,
            history,
            history_path: config.history_file.clone(),
            history_header: config.history_header.clone(),
            messages: config.messages.clone(),
            round_digits: config.round_digits,
        };
        (session, error)
    }

    /// Evaluate a raw formula and record it at the top of the history.
    pub fn submit(&mut self, raw: &str) -> Calculation {
        let calculation = self.calculator.calculate(raw);
        let result = calculation.outcome.message(&self.messages);
        self.history
            .prepend(HistoryEntry::new(calculation.expression.as_str(), result));
        calculation
    }

    /// Text that would land in the formula field after pasting `raw`.
    pub fn paste(&self, raw: &str) -> String {
        self.calculator.filter_paste(raw)
    }

    /// Round the newest result, by default to the configured digits.
    ///
    /// The history itself is not changed.
    ///
    /// # Errors
    ///
    /// [`RoundError::NoResult`] on an empty history, otherwise as
    /// [`Calculator::round_result`].
    pub fn round_last(&self, digits: Option<u32>) -> Result<String, RoundError> {
        let latest = self.history.latest().ok_or(RoundError::NoResult)?;
        self.calculator
            .round_result(latest.result(), digits.unwrap_or(self.round_digits))
    }

    /// Clear the history if `confirm` agrees. Returns whether it was cleared.
    pub fn clear_history(&mut self, confirm: &dyn Confirm) -> bool {
        let prompt = ClearPrompt {
            question: &self.messages.clear_question,
            accept: &self.messages.clear_accept,
            reject: &self.messages.clear_reject,
        };
        if !confirm.confirm(&prompt) {
            tracing::debug!("history clear declined");
            return false;
        }
        self.history.clear();
        tracing::info!("history cleared");
        true
    }

    /// Write the history to its file.
    ///
    /// # Errors
    ///
    /// See [`HistoryLog::save`]. The in-memory history is kept.
    pub fn save(&self) -> Result<(), HistoryWriteError> {
        self.history
            .save(&self.history_path, &self.history_header)
            .inspect_err(|e| tracing::warn!(error = %e, "history not saved"))
    }

    /// The history, newest first.
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// Where the history is saved.
    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Texts shown to the user.
    pub fn messages(&self) -> &Messages {
        &self.messages
    }
}
