//! Configuration file loading with precedence handling.

use crate::model::Messages;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "SAFECALC_CONFIG";

/// Environment variable overriding the history file location.
pub const HISTORY_ENV_VAR: &str = "SAFECALC_HISTORY";

/// History file name used when nothing else is configured.
pub const DEFAULT_HISTORY_FILE: &str = "results.csv";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to read config file (permission issues, not a file, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/safecalc/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Where the calculation history is loaded from and saved to.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Decimal places used by the round command.
    #[serde(default)]
    pub round_digits: Option<u32>,

    /// Column labels written as the first row of the history file.
    #[serde(default)]
    pub history_header: Option<(String, String)>,

    /// User-facing texts.
    #[serde(default)]
    pub messages: Option<MessagesSection>,
}

/// `[messages]` section from TOML.
///
/// ```toml
/// [messages]
/// division_by_zero = "Error. Division by 0"
/// clear_question = "Erase the whole history?"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MessagesSection {
    /// Shown instead of a result when a denominator is zero.
    pub division_by_zero: Option<String>,
    /// Shown instead of a result for malformed formulas.
    pub syntax_error: Option<String>,
    /// Shown instead of a result when the formula has disallowed symbols.
    pub invalid_symbol: Option<String>,
    /// Prefix of the notification for an unreadable history file.
    pub history_read_error: Option<String>,
    /// Prefix of the notification for a failed history save.
    pub history_write_error: Option<String>,
    /// Question asked before the history is erased.
    pub clear_question: Option<String>,
    /// Label of the answer that erases the history.
    pub clear_accept: Option<String>,
    /// Label of the answer that keeps the history.
    pub clear_reject: Option<String>,
}

impl MessagesSection {
    fn merge_into(self, defaults: Messages) -> Messages {
        Messages {
            division_by_zero: self.division_by_zero.unwrap_or(defaults.division_by_zero),
            syntax_error: self.syntax_error.unwrap_or(defaults.syntax_error),
            invalid_symbol: self.invalid_symbol.unwrap_or(defaults.invalid_symbol),
            history_read_error: self
                .history_read_error
                .unwrap_or(defaults.history_read_error),
            history_write_error: self
                .history_write_error
                .unwrap_or(defaults.history_write_error),
            clear_question: self.clear_question.unwrap_or(defaults.clear_question),
            clear_accept: self.clear_accept.unwrap_or(defaults.clear_accept),
            clear_reject: self.clear_reject.unwrap_or(defaults.clear_reject),
        }
    }
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// History file path.
    pub history_file: PathBuf,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
    /// Decimal places for the round command.
    pub round_digits: u32,
    /// History file header labels (expression, result).
    pub history_header: (String, String),
    /// User-facing texts.
    pub messages: Messages,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            history_file: default_history_path(),
            log_file_path: default_log_path(),
            round_digits: 2,
            history_header: ("Expression".to_string(), "Result".to_string()),
            messages: Messages::default(),
        }
    }
}

/// Default history file: `results.csv` in the working directory.
pub fn default_history_path() -> PathBuf {
    PathBuf::from(DEFAULT_HISTORY_FILE)
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/safecalc/safecalc.log` on Unix-like systems,
/// or appropriate platform path on other systems. Falls back to the current
/// directory if no state directory can be determined.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("safecalc").join("safecalc.log")
    } else {
        PathBuf::from("safecalc.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path,
                reason: e.to_string(),
            })
        }
    };

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path (`~/.config/safecalc/config.toml` on Unix).
///
/// Returns `None` if the config directory cannot be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("safecalc").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `SAFECALC_CONFIG` environment variable
/// 3. Default path `~/.config/safecalc/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        history_file: config.history_file.unwrap_or(defaults.history_file),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        round_digits: config.round_digits.unwrap_or(defaults.round_digits),
        history_header: config.history_header.unwrap_or(defaults.history_header),
        messages: match config.messages {
            Some(section) => section.merge_into(defaults.messages),
            None => defaults.messages,
        },
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `SAFECALC_HISTORY` for the history file location.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(history) = std::env::var(HISTORY_ENV_VAR) {
        if !history.is_empty() {
            config.history_file = PathBuf::from(history);
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    history_override: Option<PathBuf>,
) -> ResolvedConfig {
    if let Some(history) = history_override {
        config.history_file = history;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
