//! Fixed-precision numeric kernel shared by every scoring rule.
//!
//! All rule scores pass through the same [`MathContext`] so that outcomes
//! produced by different rules can be summed without precision drift.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Precision and rounding applied to every intermediate kernel result.
#[derive(Debug, Clone, Copy)]
pub struct MathContext {
    pub significant_digits: u32,
    pub rounding: RoundingStrategy,
}

/// Ten significant digits, round-half-up.
pub const MATH_CONTEXT: MathContext = MathContext {
    significant_digits: 10,
    rounding: RoundingStrategy::MidpointAwayFromZero,
};

impl MathContext {
    pub fn round(&self, value: Decimal) -> Decimal {
        value
            .round_sf_with_strategy(self.significant_digits, self.rounding)
            .unwrap_or(value)
    }

    /// Division rounded into the context. `None` when `divisor` is zero.
    pub fn divide(&self, dividend: Decimal, divisor: Decimal) -> Option<Decimal> {
        dividend.checked_div(divisor).map(|value| self.round(value))
    }

    pub fn multiply(&self, lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
        lhs.checked_mul(rhs).map(|value| self.round(value))
    }

    pub fn add(&self, lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
        lhs.checked_add(rhs).map(|value| self.round(value))
    }
}

/// Failure inside the kernel, surfaced to the calling rule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KernelError {
    #[error("{operation} produced a non-finite value for input {input}")]
    NonFinite {
        operation: &'static str,
        input: f64,
    },
    #[error("{operation} overflowed the decimal range")]
    Overflow { operation: &'static str },
}

fn to_decimal(operation: &'static str, input: f64, value: f64) -> Result<Decimal, KernelError> {
    if !value.is_finite() {
        return Err(KernelError::NonFinite { operation, input });
    }
    // below the decimal scale; rounds to zero in any context
    if value.abs() < 1e-28 {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_f64(value).ok_or(KernelError::Overflow { operation })
}

/// `log1p(x) / log1p(cap)` in the shared context.
///
/// A non-positive `cap` yields exactly zero. Values above the cap are not
/// clamped, so the result may exceed one.
pub fn normalized_log(x: i64, cap: i64) -> Result<Decimal, KernelError> {
    if cap <= 0 {
        return Ok(Decimal::ZERO);
    }

    let log_x = to_decimal("log1p", x as f64, (x as f64).ln_1p())?;
    let log_cap = to_decimal("log1p", cap as f64, (cap as f64).ln_1p())?;

    MATH_CONTEXT
        .divide(log_x, log_cap)
        .ok_or(KernelError::Overflow {
            operation: "normalized_log",
        })
}

/// Exponential decay `exp(-ln(2) / max(1, half_life) * max(0, days))`.
///
/// Negative day counts count as zero days; half-lives below one are floored
/// to one.
pub fn decay_from_half_life(days: i64, half_life_days: i64) -> Result<Decimal, KernelError> {
    let days = Decimal::from(days.max(0));
    let half_life = Decimal::from(half_life_days.max(1));

    let ln2 = to_decimal("ln", 2.0, std::f64::consts::LN_2)?;
    let lambda = MATH_CONTEXT
        .divide(ln2, half_life)
        .ok_or(KernelError::Overflow {
            operation: "decay_rate",
        })?;
    let exponent = MATH_CONTEXT
        .multiply(-lambda, days)
        .ok_or(KernelError::Overflow {
            operation: "decay_exponent",
        })?;

    let exponent = exponent.to_f64().ok_or(KernelError::Overflow {
        operation: "decay_exponent",
    })?;
    let decayed = to_decimal("exp", exponent, exponent.exp())?;

    Ok(MATH_CONTEXT.round(decayed))
}
