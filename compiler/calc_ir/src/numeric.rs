//! Epsilon-tolerant numeric helpers shared by every engine.

/// Epsilon equality: `|a - b| < f64::EPSILON`.
#[inline]
pub fn eps_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// Whether `value` counts as false in a condition.
#[inline]
pub fn is_zero(value: f64) -> bool {
    eps_eq(value, 0.0)
}

/// Convert a boolean to the language's truth values, exactly 1.0 or 0.0.
#[inline]
pub fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}
