//! Configuration module.
//!
//! Two kinds of configuration live here:
//!
//! - [`CalcConfig`]: the immutable grammar tables (character substitutions,
//!   whitelist sets, result formatting) handed to every core component at
//!   construction time.
//! - [`loader`]: the TOML application configuration for the shell (history
//!   file location, log file, user-facing texts).

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_history_path,
    default_log_path, load_config_file, load_config_with_precedence, merge_config, ConfigError,
    ConfigFile, MessagesSection, ResolvedConfig,
};

use crate::evaluator::format::FormatRules;

/// Characters a normalized formula may consist of, besides function names.
pub const VALID_CHARACTERS: &str = "0123456789.+-*/()";

/// Named functions and constants a formula may reference.
pub const VALID_FUNCTION_NAMES: [&str; 14] = [
    "sqrt", "degrees", "radians", "cos", "sin", "tan", "acos", "asin", "atan", "log", "log10",
    "abs", "pi", "e",
];

/// Locale and typo variants rewritten before validation.
///
/// Keys are single characters and no replacement contains a key, so the
/// rewrite is order-independent and idempotent.
pub const SUBSTITUTIONS: [(char, &str); 15] = [
    (',', "."),
    (' ', ""),
    ('\t', ""),
    ('\n', ""),
    ('\r', ""),
    ('\'', ""),
    ('\u{2019}', ""), // right single quotation mark
    ('_', ""),
    (':', "/"),
    ('^', "**"),
    ('x', "*"),
    ('\u{0445}', "*"), // Cyrillic small letter ha
    ('\u{2013}', "-"), // en dash
    ('\u{2014}', "-"), // em dash
    ('\u{2212}', "-"), // minus sign
];

/// Grammar configuration shared by the normalizer, validator and evaluator.
///
/// Built once (usually via [`CalcConfig::default`]) and passed by reference
/// into each component constructor. Nothing reads ambient module state.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcConfig {
    /// Character-to-string rewrite table applied by the normalizer.
    pub substitutions: Vec<(char, String)>,
    /// Single characters accepted by the whitelist.
    pub valid_characters: String,
    /// Function and constant names accepted by the whitelist.
    pub function_names: Vec<String>,
    /// How numeric results are turned into strings.
    pub format: FormatRules,
}

impl Default for CalcConfig {
    fn default() -> Self {
        Self {
            substitutions: SUBSTITUTIONS
                .iter()
                .map(|(from, to)| (*from, (*to).to_string()))
                .collect(),
            valid_characters: VALID_CHARACTERS.to_string(),
            function_names: VALID_FUNCTION_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            format: FormatRules::default(),
        }
    }
}

impl CalcConfig {
    /// Function names ordered longest first, ties broken alphabetically.
    ///
    /// Regex alternation is leftmost-first, so this order makes `log10`
    /// win over `log` and `degrees` over `e`.
    pub fn function_names_longest_first(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.function_names.iter().map(String::as_str).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names.dedup();
        names
    }
}
