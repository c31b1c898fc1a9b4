//! Character normalization.
//!
//! Rewrites locale and typo variants (decimal comma, `x` as multiplication,
//! dashes, digit-group separators, whitespace) into the canonical character
//! set the whitelist understands.

use crate::config::CalcConfig;
use std::collections::HashMap;

/// Applies the substitution table from [`CalcConfig`].
#[derive(Debug, Clone)]
pub struct Normalizer {
    table: HashMap<char, String>,
}

impl Normalizer {
    /// Build the lookup table from the configured substitutions.
    pub fn new(config: &CalcConfig) -> Self {
        Self {
            table: config.substitutions.iter().cloned().collect(),
        }
    }

    /// Rewrite every character with a table entry; keep all others.
    ///
    /// Total and pure: defined for every input, empty maps to empty.
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match self.table.get(&c) {
                Some(replacement) => out.push_str(replacement),
                None => out.push(c),
            }
        }
        out
    }
}
