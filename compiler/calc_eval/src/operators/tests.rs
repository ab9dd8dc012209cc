use calc_ir::{BinaryOp, FaultCategory, UnaryOp};

use super::*;

fn bin(left: f64, right: f64, op: BinaryOp) -> f64 {
    match evaluate_binary(left, right, op) {
        Ok(v) => v,
        Err(e) => panic!("unexpected fault: {e}"),
    }
}

#[test]
fn arithmetic() {
    assert_eq!(bin(2.0, 3.0, BinaryOp::Add), 5.0);
    assert_eq!(bin(2.0, 3.0, BinaryOp::Sub), -1.0);
    assert_eq!(bin(2.0, 3.0, BinaryOp::Mul), 6.0);
    assert_eq!(bin(3.0, 2.0, BinaryOp::Div), 1.5);
}

#[test]
fn division_by_near_zero_faults() {
    for divisor in [0.0, -0.0, f64::EPSILON / 4.0] {
        let err = evaluate_binary(1.0, divisor, BinaryOp::Div);
        assert_eq!(
            err.map_err(|e| e.category()),
            Err(FaultCategory::Arithmetic)
        );
    }
}

#[test]
fn equality_is_epsilon_tolerant() {
    assert_eq!(bin(0.1 + 0.2, 0.3, BinaryOp::Eq), 1.0);
    assert_eq!(bin(0.1 + 0.2, 0.3, BinaryOp::NotEq), 0.0);
    assert_eq!(bin(1.0, 2.0, BinaryOp::Eq), 0.0);
}

#[test]
fn ordering_respects_epsilon() {
    let a = 0.1 + 0.2;
    let b = 0.3;
    // a is a hair above b but within epsilon: equal, so neither strictly less nor greater.
    assert_eq!(bin(a, b, BinaryOp::Gt), 0.0);
    assert_eq!(bin(b, a, BinaryOp::Lt), 0.0);
    assert_eq!(bin(a, b, BinaryOp::GtEq), 1.0);
    assert_eq!(bin(b, a, BinaryOp::LtEq), 1.0);

    assert_eq!(bin(1.0, 2.0, BinaryOp::Lt), 1.0);
    assert_eq!(bin(2.0, 1.0, BinaryOp::Gt), 1.0);
    assert_eq!(bin(2.0, 1.0, BinaryOp::LtEq), 0.0);
    assert_eq!(bin(1.0, 2.0, BinaryOp::GtEq), 0.0);
}

#[test]
fn comparisons_yield_exact_truth_values() {
    for op in [
        BinaryOp::Eq,
        BinaryOp::NotEq,
        BinaryOp::Lt,
        BinaryOp::LtEq,
        BinaryOp::Gt,
        BinaryOp::GtEq,
    ] {
        let v = bin(3.5, -1.25, op);
        assert!(v == 0.0 || v == 1.0, "{op:?} gave {v}");
    }
}

#[test]
fn unary() {
    assert_eq!(evaluate_unary(4.0, UnaryOp::Neg), -4.0);
    assert_eq!(evaluate_unary(0.0, UnaryOp::Not), 1.0);
    assert_eq!(evaluate_unary(f64::EPSILON / 2.0, UnaryOp::Not), 1.0);
    assert_eq!(evaluate_unary(-3.0, UnaryOp::Not), 0.0);
}

#[test]
fn values_format_compactly() {
    assert_eq!(format_value(3.0), "3");
    assert_eq!(format_value(-1.5), "-1.5");
    assert_eq!(format_value(0.0), "0");
}
