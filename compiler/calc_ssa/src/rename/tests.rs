use calc_ir::BinaryOp;
use pretty_assertions::assert_eq;
use smallvec::smallvec;

use super::*;

fn assign(dest: &str, value: SsaOperand) -> SsaInst {
    SsaInst::Assign {
        dest: SsaVar::user(dest),
        value: SsaExpr::Copy(value),
    }
}

fn read_of(name: &str) -> SsaOperand {
    SsaOperand::Var(SsaVar::user(name))
}

fn konst(value: f64) -> SsaOperand {
    SsaOperand::Const(value)
}

fn branch(then_arm: Vec<SsaInst>, else_arm: Vec<SsaInst>) -> SsaInst {
    SsaInst::Branch {
        cond: read_of("c"),
        then_arm: then_arm.into(),
        else_arm: else_arm.into(),
    }
}

fn renamed(insts: Vec<SsaInst>, live_in: &[&str]) -> String {
    rename(insts.into(), live_in).to_string()
}

#[test]
fn live_in_names_start_at_zero() {
    let list = vec![SsaInst::Assign {
        dest: SsaVar::user("n"),
        value: SsaExpr::Binary {
            op: BinaryOp::Add,
            left: read_of("n"),
            right: konst(1.0),
        },
    }];
    assert_eq!(renamed(list, &["n"]), "n_1 = n_0 + 1\n");
}

#[test]
fn unseen_reads_are_live_in() {
    let list = vec![assign("y", read_of("x")), assign("x", read_of("y"))];
    assert_eq!(renamed(list, &[]), "y_1 = x_0\nx_1 = y_1\n");
}

#[test]
fn divergent_arms_get_sorted_phis() {
    let list = vec![
        branch(
            vec![assign("z", konst(1.0)), assign("a", konst(1.0))],
            vec![assign("a", konst(2.0)), assign("z", konst(2.0))],
        ),
        assign("r", read_of("z")),
    ];
    let expected = "\
if c_0 {
    z_1 = 1
    a_1 = 1
} else {
    a_2 = 2
    z_2 = 2
}
a_3 = phi(a_1, a_2)
z_3 = phi(z_1, z_2)
r_1 = z_3
";
    assert_eq!(renamed(list, &[]), expected);
}

#[test]
fn single_arm_write_adopts_that_version() {
    let list = vec![
        branch(vec![assign("x", konst(5.0))], vec![]),
        assign("r", read_of("x")),
    ];
    let expected = "\
if c_0 {
    x_1 = 5
} else {
}
r_1 = x_1
";
    assert_eq!(renamed(list, &[]), expected);
}

#[test]
fn write_against_live_in_gets_phi() {
    // x is live-in; only the then-arm writes it.
    let list = vec![
        branch(vec![assign("x", konst(5.0))], vec![]),
        assign("r", read_of("x")),
    ];
    let expected = "\
if c_0 {
    x_1 = 5
} else {
}
x_2 = phi(x_1, x_0)
r_1 = x_2
";
    assert_eq!(renamed(list, &["x"]), expected);
}

#[test]
fn unchanged_variables_get_no_phi() {
    let list = vec![
        assign("x", konst(1.0)),
        branch(
            vec![assign("t", read_of("x"))],
            vec![assign("t", read_of("x"))],
        ),
    ];
    let expected = "\
x_1 = 1
if c_0 {
    t_1 = x_1
} else {
    t_2 = x_1
}
t_3 = phi(t_1, t_2)
";
    assert_eq!(renamed(list, &[]), expected);
}

#[test]
fn nested_joins_merge_outward() {
    let inner = SsaInst::Branch {
        cond: read_of("d"),
        then_arm: vec![assign("x", konst(1.0))].into(),
        else_arm: vec![assign("x", konst(2.0))].into(),
    };
    let list = vec![
        assign("x", konst(0.0)),
        branch(vec![inner], vec![]),
        assign("r", read_of("x")),
    ];
    let expected = "\
x_1 = 0
if c_0 {
    if d_0 {
        x_2 = 1
    } else {
        x_3 = 2
    }
    x_4 = phi(x_2, x_3)
} else {
}
x_5 = phi(x_4, x_1)
r_1 = x_5
";
    assert_eq!(renamed(list, &[]), expected);
}

#[test]
fn temporaries_and_versioned_names_are_untouched() {
    let list = vec![
        SsaInst::Assign {
            dest: SsaVar::Temp(7),
            value: SsaExpr::Copy(SsaOperand::Var(SsaVar::versioned("q", 9))),
        },
        SsaInst::Phi {
            dest: SsaVar::user("r"),
            sources: smallvec![SsaVar::Temp(7), SsaVar::Temp(8)],
        },
    ];
    assert_eq!(renamed(list, &[]), "%7 = q_9\nr_1 = phi(%7, %8)\n");
}
