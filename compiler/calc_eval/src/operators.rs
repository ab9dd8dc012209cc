//! Operator semantics.
//!
//! All values are `f64`. Equality and truthiness are epsilon-tolerant
//! (`f64::EPSILON`); comparisons yield exactly `1.0` or `0.0`.

use calc_ir::{eps_eq, is_zero, truth, BinaryOp, UnaryOp};

use crate::errors::{division_by_zero, EvalResult};

/// Evaluate a binary operation.
///
/// Division faults when the divisor is within epsilon of zero.
pub fn evaluate_binary(left: f64, right: f64, op: BinaryOp) -> EvalResult {
    let value = match op {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => {
            if is_zero(right) {
                return Err(division_by_zero());
            }
            left / right
        }
        BinaryOp::Eq => truth(eps_eq(left, right)),
        BinaryOp::NotEq => truth(!eps_eq(left, right)),
        BinaryOp::Lt => truth(left < right && !eps_eq(left, right)),
        BinaryOp::LtEq => truth(left < right || eps_eq(left, right)),
        BinaryOp::Gt => truth(left > right && !eps_eq(left, right)),
        BinaryOp::GtEq => truth(left > right || eps_eq(left, right)),
    };
    Ok(value)
}

/// Evaluate a unary operation. `!x` is `1.0` iff `x` is near zero.
pub fn evaluate_unary(value: f64, op: UnaryOp) -> f64 {
    match op {
        UnaryOp::Neg => -value,
        UnaryOp::Not => truth(is_zero(value)),
    }
}

/// Render a value the way trace lines show it.
///
/// Integral values print without a fractional part (`3`, not `3.0`).
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

#[cfg(test)]
mod tests;
