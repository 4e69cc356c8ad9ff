//! Compile-time literal values.
//!
//! [`Literal`] is the closed set of values the folder can compute with.
//! Every consumer matches it exhaustively; adding a kind is a compile error
//! at every use site, which is the point.
//!
//! # Numeric promotion
//!
//! Mixed-kind operations promote along the fixed ranking
//! `boolean < int < long < float < double` ([`NumRank`]). The common kind of
//! two operands is the higher-ranked one; when neither operand is ranked the
//! common kind is `int`.

use std::fmt;
use std::rc::Rc;

/// Fixed numeric promotion ranking.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum NumRank {
    Boolean,
    Int,
    Long,
    Float,
    Double,
}

impl NumRank {
    /// Common rank of two operands.
    ///
    /// `None` stands for an operand that has no rank (strings, objects,
    /// `char`, `byte`, `short`).
    pub fn promote(left: Option<NumRank>, right: Option<NumRank>) -> NumRank {
        match (left, right) {
            (Some(l), Some(r)) => l.max(r),
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => NumRank::Int,
        }
    }

    /// Whether this rank takes part in arithmetic.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, NumRank::Boolean)
    }

    pub const fn is_integral(self) -> bool {
        matches!(self, NumRank::Int | NumRank::Long)
    }

    pub const fn name(self) -> &'static str {
        match self {
            NumRank::Boolean => "boolean",
            NumRank::Int => "int",
            NumRank::Long => "long",
            NumRank::Float => "float",
            NumRank::Double => "double",
        }
    }
}

/// A compile-time value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Null,
    String(Rc<str>),
    /// `long` is set for `42L` and for values that do not fit in `int`.
    Integer { value: i64, long: bool },
    /// `double` is clear for `1.5f`. Single-precision values are stored
    /// already rounded to `f32`.
    FloatingPoint { value: f64, double: bool },
    Boolean(bool),
}

impl Literal {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Literal::String(text.into())
    }

    pub const fn int(value: i32) -> Self {
        Literal::Integer {
            value: value as i64,
            long: false,
        }
    }

    pub const fn long(value: i64) -> Self {
        Literal::Integer { value, long: true }
    }

    pub fn float(value: f32) -> Self {
        Literal::FloatingPoint {
            value: f64::from(value),
            double: false,
        }
    }

    pub const fn double(value: f64) -> Self {
        Literal::FloatingPoint {
            value,
            double: true,
        }
    }

    /// Rank of this literal in the promotion order, if it has one.
    pub const fn rank(&self) -> Option<NumRank> {
        match self {
            Literal::Boolean(_) => Some(NumRank::Boolean),
            Literal::Integer { long: false, .. } => Some(NumRank::Int),
            Literal::Integer { long: true, .. } => Some(NumRank::Long),
            Literal::FloatingPoint { double: false, .. } => Some(NumRank::Float),
            Literal::FloatingPoint { double: true, .. } => Some(NumRank::Double),
            Literal::Null | Literal::String(_) => None,
        }
    }

    /// Name of the literal's kind, for diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Literal::Null => "null",
            Literal::String(_) => "String",
            Literal::Integer { long: false, .. } => "int",
            Literal::Integer { long: true, .. } => "long",
            Literal::FloatingPoint { double: false, .. } => "float",
            Literal::FloatingPoint { double: true, .. } => "double",
            Literal::Boolean(_) => "boolean",
        }
    }

    /// Parse numeric text the way literal coercion does.
    ///
    /// Text containing `.` or an exponent is floating-point (`double`);
    /// anything else is integral, `int` when it fits and `long` otherwise.
    /// Surrounding whitespace is not accepted.
    pub fn parse_numeric(text: &str) -> Option<Literal> {
        if text.is_empty() || text.trim() != text {
            return None;
        }
        if is_floating_text(text) {
            let value: f64 = text.parse().ok()?;
            return value.is_finite().then_some(Literal::double(value));
        }
        let value: i64 = text.parse().ok()?;
        Some(Literal::Integer {
            value,
            long: i32::try_from(value).is_err(),
        })
    }

    /// Parse `true`/`false`, ignoring ASCII case.
    pub fn parse_boolean(text: &str) -> Option<bool> {
        if text.eq_ignore_ascii_case("true") {
            Some(true)
        } else if text.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }

    /// View a string literal as a number or boolean for folding.
    ///
    /// Non-string literals are returned unchanged. A string that parses as
    /// neither yields `None`; the operator then renders a runtime
    /// coercion instead of folding.
    pub fn numeric_view(&self) -> Option<Literal> {
        match self {
            Literal::String(text) => Literal::parse_numeric(text)
                .or_else(|| Literal::parse_boolean(text).map(Literal::Boolean)),
            other => Some(other.clone()),
        }
    }

    /// Value widened to `i64`, for integral ranks.
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Literal::Integer { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Value as `f64`, converting integers.
    #[expect(
        clippy::cast_precision_loss,
        reason = "matches the host's long-to-double conversion"
    )]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Literal::Integer { value, .. } => Some(*value as f64),
            Literal::FloatingPoint { value, .. } => Some(*value),
            _ => None,
        }
    }
}

/// Narrow a stored single-precision value back to `f32`.
#[expect(
    clippy::cast_possible_truncation,
    reason = "single-precision literals are stored pre-rounded"
)]
pub fn narrow(value: f64) -> f32 {
    value as f32
}

fn is_floating_text(text: &str) -> bool {
    text.contains('.')
        || text.contains(['e', 'E'])
        || matches!(text, "NaN" | "Infinity" | "-Infinity")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => f.write_str("null"),
            Literal::String(text) => f.write_str(text),
            Literal::Integer { value, .. } => write!(f, "{value}"),
            Literal::FloatingPoint {
                value,
                double: true,
            } => f.write_str(&format_double(*value)),
            Literal::FloatingPoint {
                value,
                double: false,
            } => f.write_str(&format_float(narrow(*value))),
            Literal::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// Host string form of a `double`.
///
/// Whole numbers keep a trailing `.0`, very large and very small magnitudes
/// use `E` notation. The runtime's string conversion calls the same
/// function so folded and evaluated concatenations agree.
pub fn format_double(value: f64) -> String {
    format_decimal(value, value.to_string(), format!("{value:e}"))
}

/// Host string form of a `float`.
pub fn format_float(value: f32) -> String {
    format_decimal(f64::from(value), value.to_string(), format!("{value:e}"))
}

fn format_decimal(value: f64, plain: String, scientific: String) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        if plain.contains('.') {
            plain
        } else {
            format!("{plain}.0")
        }
    } else {
        // `1.5e10` -> `1.5E10`, `1e-5` -> `1.0E-5`
        let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
        if mantissa.contains('.') {
            format!("{mantissa}E{exponent}")
        } else {
            format!("{mantissa}.0E{exponent}")
        }
    }
}

#[cfg(test)]
mod tests;
