//! Error types for safecalc.
//!
//! Each concern owns a `thiserror` enum; [`AppError`] wraps them for the
//! binary so they compose with `?`.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level error of the command-line shell
//!   - [`ConfigError`] - unreadable or invalid config file
//!   - [`LoggingError`] - log file could not be set up
//!   - [`HistoryReadError`] - history file exists but cannot be loaded
//!   - [`HistoryWriteError`] - history file cannot be written
//!   - `std::io::Error` - terminal (stdin/stdout) failures
//!
//! # Recovery Strategy
//!
//! Formula problems are not errors at all: they are
//! [`EvaluationOutcome`](crate::model::EvaluationOutcome) variants that end up
//! in the result field and in the history. History errors are **non-fatal**:
//! the shell shows them once and keeps the in-memory log. Only config and
//! terminal errors stop the program.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Log file could not be prepared.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// History file could not be loaded.
    #[error(transparent)]
    HistoryRead(#[from] HistoryReadError),

    /// History file could not be saved.
    #[error(transparent)]
    HistoryWrite(#[from] HistoryWriteError),

    /// Reading commands or printing results failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Failures while loading the history file.
///
/// A missing file is not represented here: it loads as an empty log.
#[derive(Debug, Error)]
pub enum HistoryReadError {
    /// The file exists but could not be read (permissions, not a file, ...).
    #[error("Failed to read history file {path:?}: {source}")]
    Io {
        /// History file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid `;`-separated UTF-8 text.
    #[error("History file {path:?} is malformed: {source}")]
    Csv {
        /// History file path.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A row does not have both an expression and a result column.
    #[error("History file {path:?} line {line} has no result column")]
    MissingColumn {
        /// History file path.
        path: PathBuf,
        /// 1-based line number of the offending row.
        line: u64,
    },
}

/// Failures while saving the history file.
#[derive(Debug, Error)]
pub enum HistoryWriteError {
    /// The file could not be created or written.
    #[error("Failed to write history file {path:?}: {source}")]
    Io {
        /// History file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("Failed to serialize history to {path:?}: {source}")]
    Csv {
        /// History file path.
        path: PathBuf,
        /// The underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Failures of the round command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoundError {
    /// Nothing has been calculated yet.
    #[error("There is no result to round")]
    NoResult,

    /// The value to round is an error message or otherwise not a finite number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// More decimal places than an `f64` can carry.
    #[error("Cannot round to {requested} decimal places (maximum is {max})")]
    TooManyDigits {
        /// Requested number of decimal places.
        requested: u32,
        /// Largest supported number of decimal places.
        max: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn history_read_error_io_display_mentions_path_and_cause() {
        let err = HistoryReadError::Io {
            path: PathBuf::from("/tmp/results.csv"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "access denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/results.csv"));
        assert!(msg.contains("access denied"));
    }

    #[test]
    fn history_read_error_missing_column_display() {
        let err = HistoryReadError::MissingColumn {
            path: PathBuf::from("results.csv"),
            line: 7,
        };
        assert!(err.to_string().contains("line 7"));
    }

    #[test]
    fn history_write_error_keeps_source() {
        use std::error::Error as _;

        let err = HistoryWriteError::Io {
            path: PathBuf::from("/readonly/results.csv"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        let source = err.source().expect("source should be exposed");
        assert_eq!(source.to_string(), "disk full");
    }

    #[test]
    fn round_error_display() {
        let err = RoundError::TooManyDigits {
            requested: 40,
            max: 15,
        };
        assert_eq!(
            err.to_string(),
            "Cannot round to 40 decimal places (maximum is 15)"
        );
        assert_eq!(
            RoundError::NotANumber("Syntax error".into()).to_string(),
            "'Syntax error' is not a number"
        );
    }

    #[test]
    fn app_error_from_history_read_error_is_transparent() {
        let read_err = HistoryReadError::MissingColumn {
            path: PathBuf::from("h.csv"),
            line: 2,
        };
        let expected = read_err.to_string();
        let app_err: AppError = read_err.into();
        assert_eq!(app_err.to_string(), expected);
    }

    #[test]
    fn app_error_from_config_error() {
        let config_err = ConfigError::ParseError {
            path: PathBuf::from("config.toml"),
            reason: "expected `=`".to_string(),
        };
        let app_err: AppError = config_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("expected `=`"));
    }

    #[test]
    fn app_error_from_io_error() {
        let app_err: AppError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(app_err.to_string().contains("pipe closed"));
    }
}
