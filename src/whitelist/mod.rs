//! Whitelist validation and salvage filtering.
//!
//! The whitelist is one regex alternation built from the valid character set
//! and the valid function names. [`WhitelistValidator::is_valid`] requires the
//! whole string to be a repetition of that alternation (formula submission is
//! all or nothing); [`WhitelistValidator::extract_safe`] keeps only the
//! matching pieces (clipboard paste is best-effort salvage).
//!
//! Function names match as plain substrings with no word boundaries, so
//! `sinx` normalizes to `sin*` and passes validation. The evaluator then
//! rejects it as a syntax error.

use crate::config::CalcConfig;
use regex::Regex;

/// Characters that need a backslash to be literal inside a regex.
const REGEX_METACHARACTERS: &str = r".^$*+?{}[]\|()";

/// Compiled whitelist. Construct once and reuse; matching never mutates it.
#[derive(Debug, Clone)]
pub struct WhitelistValidator {
    pattern: String,
    token: Regex,
    full: Regex,
}

impl WhitelistValidator {
    /// Compile the whitelist alternation for `config`.
    ///
    /// # Errors
    ///
    /// Only fails if the alternation exceeds the regex size limit, which the
    /// built-in tables never do.
    pub fn new(config: &CalcConfig) -> Result<Self, regex::Error> {
        let pattern = build_pattern(config);
        let token = Regex::new(&pattern)?;
        let full = Regex::new(&format!("^(?:{pattern})*$"))?;
        tracing::debug!(%pattern, "whitelist pattern compiled");
        Ok(Self {
            pattern,
            token,
            full,
        })
    }

    /// The alternation group, e.g. `(0|1|...|\.|\+|-|...|sqrt|...|e)`.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether the entire string is made of whitelisted tokens.
    ///
    /// The empty string is valid (zero repetitions).
    pub fn is_valid(&self, normalized: &str) -> bool {
        self.full.is_match(normalized)
    }

    /// Keep only the whitelisted substrings, in their original order.
    pub fn extract_safe(&self, normalized: &str) -> String {
        self.token
            .find_iter(normalized)
            .map(|m| m.as_str())
            .collect()
    }
}

fn escape_metacharacter(c: char) -> String {
    if REGEX_METACHARACTERS.contains(c) {
        format!("\\{c}")
    } else {
        c.to_string()
    }
}

/// Join escaped characters and longest-first function names into one group.
fn build_pattern(config: &CalcConfig) -> String {
    let characters = config.valid_characters.chars().map(escape_metacharacter);
    let names = config
        .function_names_longest_first()
        .into_iter()
        .map(regex::escape);
    let alternatives: Vec<String> = characters.chain(names).collect();
    format!("({})", alternatives.join("|"))
}
