//! The fixed math namespace formulas are resolved against.
//!
//! Every whitelisted name maps to a [`Builtin`] here. A configured name with
//! no entry in this table can pass the whitelist but never evaluates.

use super::EvalError;
use std::f64::consts;

/// A unary function from the math table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathFunction {
    /// Square root.
    Sqrt,
    /// Radians to degrees.
    Degrees,
    /// Degrees to radians.
    Radians,
    /// Cosine (radians).
    Cos,
    /// Sine (radians).
    Sin,
    /// Tangent (radians).
    Tan,
    /// Arc cosine.
    Acos,
    /// Arc sine.
    Asin,
    /// Arc tangent.
    Atan,
    /// Natural logarithm.
    Log,
    /// Base-10 logarithm.
    Log10,
    /// Absolute value.
    Abs,
}

impl MathFunction {
    /// Apply the function.
    ///
    /// Arguments outside the domain (`sqrt(-1)`, `log(0)`, `acos(2)`) and
    /// non-finite results are errors rather than NaN or infinity.
    pub fn apply(self, x: f64) -> Result<f64, EvalError> {
        let in_domain = match self {
            Self::Sqrt => x >= 0.0,
            Self::Log | Self::Log10 => x > 0.0,
            Self::Acos | Self::Asin => (-1.0..=1.0).contains(&x),
            _ => x.is_finite(),
        };
        if !in_domain {
            return Err(EvalError::Domain {
                function: self.name(),
                argument: x,
            });
        }

        let y = match self {
            Self::Sqrt => x.sqrt(),
            Self::Degrees => x.to_degrees(),
            Self::Radians => x.to_radians(),
            Self::Cos => x.cos(),
            Self::Sin => x.sin(),
            Self::Tan => x.tan(),
            Self::Acos => x.acos(),
            Self::Asin => x.asin(),
            Self::Atan => x.atan(),
            Self::Log => x.ln(),
            Self::Log10 => x.log10(),
            Self::Abs => x.abs(),
        };

        if y.is_finite() {
            Ok(y)
        } else {
            Err(EvalError::Overflow)
        }
    }

    /// The name this function is bound to.
    pub fn name(self) -> &'static str {
        match self {
            Self::Sqrt => "sqrt",
            Self::Degrees => "degrees",
            Self::Radians => "radians",
            Self::Cos => "cos",
            Self::Sin => "sin",
            Self::Tan => "tan",
            Self::Acos => "acos",
            Self::Asin => "asin",
            Self::Atan => "atan",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Abs => "abs",
        }
    }
}

/// What a whitelisted name resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Builtin {
    /// Callable with exactly one argument.
    Function(MathFunction),
    /// A named number; cannot be called.
    Constant(f64),
}

/// Resolve a name in the math namespace.
pub fn lookup(name: &str) -> Option<Builtin> {
    let function = match name {
        "pi" => return Some(Builtin::Constant(consts::PI)),
        "e" => return Some(Builtin::Constant(consts::E)),
        "sqrt" => MathFunction::Sqrt,
        "degrees" => MathFunction::Degrees,
        "radians" => MathFunction::Radians,
        "cos" => MathFunction::Cos,
        "sin" => MathFunction::Sin,
        "tan" => MathFunction::Tan,
        "acos" => MathFunction::Acos,
        "asin" => MathFunction::Asin,
        "atan" => MathFunction::Atan,
        "log" => MathFunction::Log,
        "log10" => MathFunction::Log10,
        "abs" => MathFunction::Abs,
        _ => return None,
    };
    Some(Builtin::Function(function))
}
