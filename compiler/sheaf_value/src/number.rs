//! Numbers: exact integers with a floating-point fallback.
//!
//! Arithmetic on two integers stays exact while the result fits in an
//! `i64` and is integral; anything else is computed in `f64`. A float with
//! an integral value that fits in an `i64` is normalized back to an integer,
//! so `0.5 * 4` equals `2` exactly. Numbers are always finite: an operation
//! whose float result overflows or is undefined gives `None`.

use std::cmp::Ordering;
use std::fmt;

#[derive(Copy, Clone, Debug)]
pub enum Number {
    Int(i64),
    Float(f64),
}

// i64 range as f64; both ends are exactly representable.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_F: f64 = 9_223_372_036_854_775_808.0;

impl Number {
    pub const ZERO: Number = Number::Int(0);
    pub const ONE: Number = Number::Int(1);
    /// Largest decimal place count [`Number::round_to`] distinguishes;
    /// `10^MAX_PLACES` is finite.
    pub const MAX_PLACES: i32 = 308;

    /// A float, as an integer when it is integral and in range.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "range and integrality are checked first"
    )]
    pub fn from_f64(value: f64) -> Number {
        if value.fract() == 0.0 && (I64_MIN_F..I64_MAX_F).contains(&value) {
            Number::Int(value as i64)
        } else {
            Number::Float(value)
        }
    }

    /// A float result, `None` unless it is finite.
    fn finite(value: f64) -> Option<Number> {
        value.is_finite().then(|| Number::from_f64(value))
    }

    /// Parse literal text such as `42`, `-3.5` or `1e3`.
    pub fn parse(text: &str) -> Option<Number> {
        let text = text.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Some(Number::Int(i));
        }
        Number::finite(text.parse::<f64>().ok()?)
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "large integers only reach here on the float path"
    )]
    pub fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    pub fn as_i64(self) -> Option<i64> {
        match self {
            Number::Int(i) => Some(i),
            Number::Float(_) => None,
        }
    }

    pub fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    pub fn is_negative(self) -> bool {
        match self {
            Number::Int(i) => i < 0,
            Number::Float(f) => f < 0.0,
        }
    }

    /// `None` when the sum overflows.
    pub fn plus(self, other: Number) -> Option<Number> {
        if let (Number::Int(a), Number::Int(b)) = (self, other) {
            if let Some(sum) = a.checked_add(b) {
                return Some(Number::Int(sum));
            }
        }
        Number::finite(self.to_f64() + other.to_f64())
    }

    pub fn minus(self, other: Number) -> Option<Number> {
        self.plus(other.negate())
    }

    /// `None` when the product overflows.
    pub fn times(self, other: Number) -> Option<Number> {
        if let (Number::Int(a), Number::Int(b)) = (self, other) {
            if let Some(product) = a.checked_mul(b) {
                return Some(Number::Int(product));
            }
        }
        Number::finite(self.to_f64() * other.to_f64())
    }

    /// `None` when dividing by zero or when the quotient overflows.
    pub fn divided_by(self, other: Number) -> Option<Number> {
        if other.is_zero() {
            return None;
        }
        if let (Number::Int(a), Number::Int(b)) = (self, other) {
            if a.checked_rem(b) == Some(0) {
                if let Some(quotient) = a.checked_div(b) {
                    return Some(Number::Int(quotient));
                }
            }
        }
        Number::finite(self.to_f64() / other.to_f64())
    }

    /// `None` when the result is not a finite real number.
    pub fn raised_to(self, exponent: Number) -> Option<Number> {
        if let (Number::Int(base), Number::Int(exp)) = (self, exponent) {
            if let Ok(exp) = u32::try_from(exp) {
                if let Some(result) = base.checked_pow(exp) {
                    return Some(Number::Int(result));
                }
            }
        }
        Number::finite(self.to_f64().powf(exponent.to_f64()))
    }

    #[must_use]
    pub fn negate(self) -> Number {
        match self {
            Number::Int(i) => i
                .checked_neg()
                .map_or_else(|| Number::from_f64(-self.to_f64()), Number::Int),
            Number::Float(f) => Number::from_f64(-f),
        }
    }

    #[must_use]
    pub fn abs(self) -> Number {
        if self.is_negative() {
            self.negate()
        } else {
            self
        }
    }

    /// `None` for negative numbers.
    pub fn sqrt(self) -> Option<Number> {
        if self.is_negative() {
            return None;
        }
        Some(Number::from_f64(self.to_f64().sqrt()))
    }

    /// Round half away from zero to `places` decimal places, at most
    /// [`Number::MAX_PLACES`] either way. `None` when rounding up overflows.
    pub fn round_to(self, places: i32) -> Option<Number> {
        let places = places.clamp(-Number::MAX_PLACES, Number::MAX_PLACES);
        if places >= 0 {
            if let Number::Int(_) = self {
                return Some(self);
            }
            let scale = 10f64.powi(places);
            let scaled = self.to_f64() * scale;
            if !scaled.is_finite() {
                // No digits that fine at this magnitude.
                return Some(self);
            }
            Number::finite(scaled.round() / scale)
        } else {
            let scale = 10f64.powi(-places);
            Number::finite((self.to_f64() / scale).round() * scale)
        }
    }

    fn compare(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            _ => self.to_f64().total_cmp(&other.to_f64()),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Number) -> bool {
        self.compare(*other) == Ordering::Equal
    }
}

impl Eq for Number {}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Number) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Number {
    fn cmp(&self, other: &Number) -> Ordering {
        self.compare(*other)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::Int(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => write!(f, "{x}"),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
