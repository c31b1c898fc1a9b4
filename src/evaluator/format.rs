//! Rendering of numeric results.

use crate::model::RoundError;

/// Most decimal places [`round_result`] accepts.
pub const MAX_ROUND_DIGITS: u32 = 15;

/// Thresholds deciding how a finite `f64` is printed.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatRules {
    /// Integral values with a smaller magnitude print without a fraction.
    pub integer_limit: f64,
    /// Non-zero magnitudes below this print in scientific notation.
    pub scientific_below: f64,
    /// Magnitudes at or above this print in scientific notation.
    pub scientific_above: f64,
}

impl Default for FormatRules {
    fn default() -> Self {
        Self {
            integer_limit: 1e15,
            scientific_below: 1e-4,
            scientific_above: 1e16,
        }
    }
}

/// Render a finite value.
///
/// `4.0` prints as `4`, `24.5` as `24.5`, `1e20` as `1e20`. Negative zero
/// prints as `0`.
pub fn format_number(value: f64, rules: &FormatRules) -> String {
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if value.fract() == 0.0 && magnitude < rules.integer_limit {
        // Exact: |value| < 1e15 fits in i64 without loss.
        return format!("{}", value as i64);
    }
    if magnitude >= rules.scientific_below && magnitude < rules.scientific_above {
        return format!("{value}");
    }
    format!("{value:e}")
}

/// Round a previously rendered result to `digits` decimal places.
///
/// # Errors
///
/// [`RoundError::NotANumber`] if `result` is an error message or otherwise
/// not a finite number, [`RoundError::TooManyDigits`] above
/// [`MAX_ROUND_DIGITS`].
pub fn round_result(result: &str, digits: u32, rules: &FormatRules) -> Result<String, RoundError> {
    if digits > MAX_ROUND_DIGITS {
        return Err(RoundError::TooManyDigits {
            requested: digits,
            max: MAX_ROUND_DIGITS,
        });
    }

    let value: f64 = result
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| RoundError::NotANumber(result.to_string()))?;

    // Round in decimal, not by scaling with powers of ten.
    let rounded: f64 = format!("{value:.prec$}", prec = digits as usize)
        .parse()
        .map_err(|_| RoundError::NotANumber(result.to_string()))?;

    Ok(format_number(rounded, rules))
}
