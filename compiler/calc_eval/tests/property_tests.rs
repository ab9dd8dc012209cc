//! Property-based tests for the calc interpreter.
//!
//! Random expression trees, with stores on both sides of binary operators,
//! are evaluated both by the interpreter and by a direct recursive
//! reference, and loop/array programs are checked against closed-form
//! expectations.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use calc_eval::{buffer_handler, silent_handler, ArgValue, InterpreterBuilder};
use calc_ir::{
    BinaryOp, ExprId, FaultCategory, IncDecOp, Param, Place, ProgramBuilder, UnaryOp,
};
use proptest::prelude::*;

/// Arithmetic tree without division, so no faults are possible.
///
/// `Store`, `Bump` and `Read` share one variable `x`, so operand order
/// shows up in the result and the trace.
#[derive(Clone, Debug)]
enum Arith {
    Num(i32),
    Read,
    /// `x++`
    Bump,
    /// `x = e`
    Store(Box<Arith>),
    Neg(Box<Arith>),
    Bin(BinaryOp, Box<Arith>, Box<Arith>),
}

fn arith_strategy() -> impl Strategy<Value = Arith> {
    let leaf = prop_oneof![
        4 => (-50i32..50).prop_map(Arith::Num),
        1 => Just(Arith::Read),
        1 => Just(Arith::Bump),
    ];
    leaf.prop_recursive(6, 64, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(|e| Arith::Neg(Box::new(e))),
            inner.clone().prop_map(|e| Arith::Store(Box::new(e))),
            (
                prop_oneof![
                    Just(BinaryOp::Add),
                    Just(BinaryOp::Sub),
                    Just(BinaryOp::Mul),
                    Just(BinaryOp::Lt),
                    Just(BinaryOp::GtEq),
                    Just(BinaryOp::Eq),
                ],
                inner.clone(),
                inner,
            )
                .prop_map(|(op, l, r)| Arith::Bin(op, Box::new(l), Box::new(r))),
        ]
    })
}

/// State of the direct evaluation.
#[derive(Default)]
struct Reference {
    x: f64,
    stores: Vec<String>,
    /// Cleared once any value overflows; ordering on infinities is not compared.
    finite: bool,
}

impl Reference {
    fn new() -> Self {
        Reference {
            finite: true,
            ..Self::default()
        }
    }

    fn store(&mut self, value: f64) {
        self.x = value;
        self.stores.push(format!("x = {value}"));
    }

    /// Right operand before left, as the interpreter does.
    fn eval(&mut self, expr: &Arith) -> f64 {
        let value = match expr {
            Arith::Num(n) => f64::from(*n),
            Arith::Read => self.x,
            Arith::Bump => {
                let old = self.x;
                self.store(old + 1.0);
                old
            }
            Arith::Store(e) => {
                let value = self.eval(e);
                self.store(value);
                value
            }
            Arith::Neg(e) => -self.eval(e),
            Arith::Bin(op, l, r) => {
                let r = self.eval(r);
                let l = self.eval(l);
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Lt => f64::from(u8::from(l < r)),
                    BinaryOp::GtEq => f64::from(u8::from(l >= r)),
                    BinaryOp::Eq => f64::from(u8::from(l == r)),
                    _ => unreachable!("not generated"),
                }
            }
        };
        self.finite &= value.is_finite();
        value
    }
}

fn lower(b: &mut ProgramBuilder, expr: &Arith) -> ExprId {
    match expr {
        Arith::Num(n) => b.num(f64::from(*n)),
        Arith::Read => b.var("x"),
        Arith::Bump => {
            let x = b.scalar("x");
            b.inc_dec(IncDecOp::PostInc, Place::Scalar(x))
        }
        Arith::Store(e) => {
            let value = lower(b, e);
            b.assign("x", value)
        }
        Arith::Neg(e) => {
            let operand = lower(b, e);
            b.unary(UnaryOp::Neg, operand)
        }
        Arith::Bin(op, l, r) => {
            let l = lower(b, l);
            let r = lower(b, r);
            b.binary(*op, l, r)
        }
    }
}

proptest! {
    #[test]
    fn interpreter_matches_reference(expr in arith_strategy()) {
        // main(){ x = 0; result = <expr>; }
        let mut b = ProgramBuilder::new();
        let zero = b.num(0.0);
        let init = b.assign("x", zero);
        let value = lower(&mut b, &expr);
        let ret = b.assign("result", value);
        let body = b.seq(init, ret);
        b.function("main", vec![], body);
        let program = b.finish();

        let trace = buffer_handler();
        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(trace.clone())
            .build();
        let result = interpreter.run().unwrap();

        let mut reference = Reference::new();
        reference.store(0.0);
        let expected = reference.eval(&expr);
        prop_assume!(reference.finite);
        reference.stores.push(format!("result = {expected}"));
        prop_assert_eq!(result, expected);
        prop_assert_eq!(trace.lines(), reference.stores);
    }

    #[test]
    fn counting_loop_sums_and_traces(n in 0u32..60) {
        // sum(n){ i = 0; s = 0; while (i < n) { s = s + i; i = i + 1; } result = s; }
        let mut b = ProgramBuilder::new();
        let n_var = b.scalar("n");
        let zero = b.num(0.0);
        let init_i = b.assign("i", zero);
        let zero = b.num(0.0);
        let init_s = b.assign("s", zero);
        let i = b.var("i");
        let nv = b.var("n");
        let cond = b.binary(BinaryOp::Lt, i, nv);
        let s = b.var("s");
        let i = b.var("i");
        let add = b.binary(BinaryOp::Add, s, i);
        let step_s = b.assign("s", add);
        let i = b.var("i");
        let one = b.num(1.0);
        let inc = b.binary(BinaryOp::Add, i, one);
        let step_i = b.assign("i", inc);
        let loop_body = b.seq(step_s, step_i);
        let lp = b.while_loop(cond, loop_body);
        let s = b.var("s");
        let ret = b.assign("result", s);
        let body = b.block([init_i, init_s, lp, ret]);
        b.function("sum", vec![Param::Scalar(n_var)], body);
        let program = b.finish();

        let trace = buffer_handler();
        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(trace.clone())
            .build();
        let result = interpreter.execute("sum", &[ArgValue::Scalar(f64::from(n))]).unwrap();
        prop_assert_eq!(result, f64::from(n * n.saturating_sub(1) / 2));
        prop_assert_eq!(trace.lines().len() as u32, 3 + 2 * n);
    }

    #[test]
    fn element_access_faults_exactly_outside_bounds(len in 1u32..16, index in -8i32..24) {
        // read(){ result = a[index]; }
        let mut b = ProgramBuilder::new();
        let a = b.array("a", len);
        let idx = b.num(f64::from(index));
        let read = b.index(a, idx);
        let body = b.assign("result", read);
        b.function("main", vec![], body);
        let program = b.finish();

        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(silent_handler())
            .build();
        let in_bounds = index >= 0 && index < len as i32;
        match interpreter.run() {
            Ok(value) => {
                prop_assert!(in_bounds);
                prop_assert_eq!(value, 0.0);
            }
            Err(err) => {
                prop_assert!(!in_bounds);
                prop_assert_eq!(err.category(), FaultCategory::Range);
            }
        }
    }

    #[test]
    fn self_assignment_keeps_value(v in -1e6f64..1e6) {
        // x = v; result = (x = x)
        let mut b = ProgramBuilder::new();
        let lit = b.num(v);
        let init = b.assign("x", lit);
        let x = b.var("x");
        let again = b.assign("x", x);
        let ret = b.assign("result", again);
        let body = b.seq(init, ret);
        b.function("main", vec![], body);
        let program = b.finish();

        let trace = buffer_handler();
        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(trace.clone())
            .build();
        prop_assert_eq!(interpreter.run().unwrap(), v);
        let lines = trace.lines();
        prop_assert_eq!(&lines[0], &lines[1]);
    }

    #[test]
    fn element_write_then_read_is_exact(len in 1u32..32, slot in 0u32..32, v in any::<f64>()) {
        prop_assume!(slot < len && v.is_finite());
        // a[slot] = v; result = a[slot]
        let mut b = ProgramBuilder::new();
        let a = b.array("a", len);
        let idx = b.num(f64::from(slot));
        let lit = b.num(v);
        let store = b.assign_element(a, idx, lit);
        let idx = b.num(f64::from(slot));
        let read = b.index(a, idx);
        let ret = b.assign("result", read);
        let body = b.seq(store, ret);
        b.function("main", vec![], body);
        let program = b.finish();

        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(silent_handler())
            .build();
        prop_assert_eq!(interpreter.run().unwrap().to_bits(), v.to_bits());
    }

    #[test]
    fn near_zero_divisors_always_fault(tiny in -1e-17f64..1e-17) {
        let mut b = ProgramBuilder::new();
        let one = b.num(1.0);
        let divisor = b.num(tiny);
        let div = b.binary(BinaryOp::Div, one, divisor);
        let body = b.assign("result", div);
        b.function("main", vec![], body);
        let program = b.finish();

        let trace = buffer_handler();
        let interpreter = InterpreterBuilder::new(&program)
            .trace_handler(trace.clone())
            .build();
        let err = interpreter.run().unwrap_err();
        prop_assert_eq!(err.category(), FaultCategory::Arithmetic);
        prop_assert!(trace.lines().is_empty());
    }
}
