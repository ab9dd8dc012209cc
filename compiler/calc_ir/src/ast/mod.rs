//! Expression nodes.
//!
//! Every statement is an expression: sequencing, loops and conditionals all
//! produce a value. All children are [`ExprId`] indices into the owning
//! [`ExprArena`](crate::ExprArena); the tree is acyclic and never mutated
//! after construction.

mod operators;

pub use operators::{BinaryOp, IncDecOp, UnaryOp};

use crate::{ExprId, ExprRange, Name, VarId};

/// Assignable location.
///
/// The closed lvalue category shared by assignment and increment/decrement.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Place {
    /// A scalar variable.
    Scalar(VarId),
    /// One element of a fixed-size array: `array[index]`.
    Element { array: VarId, index: ExprId },
}

impl Place {
    /// The variable this place stores into.
    pub const fn var(self) -> VarId {
        match self {
            Place::Scalar(var) | Place::Element { array: var, .. } => var,
        }
    }
}

/// Expression variants.
///
/// The variant fixes the arity: engines match on it and never re-validate
/// the number of children.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExprKind {
    /// Numeric literal.
    Number(f64),

    /// Scalar variable read.
    Variable(VarId),

    /// `-x`, `!x`
    Unary { op: UnaryOp, operand: ExprId },

    /// `left op right`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// `target = value`
    Assign { target: Place, value: ExprId },

    /// `array[index]` read.
    Index { array: VarId, index: ExprId },

    /// `cond ? then_expr : else_expr`
    Ternary {
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
    },

    /// `++x`, `x--`, `++a[i]`, ...
    IncDec { op: IncDecOp, target: Place },

    /// `first; second`
    Seq { first: ExprId, second: ExprId },

    /// `while (cond) body`
    While { cond: ExprId, body: ExprId },

    /// `if (cond) then_branch else else_branch`
    ///
    /// A missing `else` is an `Empty` node.
    If {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },

    /// `callee(args...)`, resolved through the function registry by name.
    Call { callee: Name, args: ExprRange },

    /// Empty statement.
    Empty,
}

impl ExprKind {
    /// Short human-readable name of the node kind, for diagnostics.
    pub const fn describe(&self) -> &'static str {
        match self {
            ExprKind::Number(_) => "number",
            ExprKind::Variable(_) => "variable",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Assign {
                target: Place::Scalar(_),
                ..
            } => "assignment",
            ExprKind::Assign {
                target: Place::Element { .. },
                ..
            } => "array element assignment",
            ExprKind::Index { .. } => "array index",
            ExprKind::Ternary { .. } => "ternary",
            ExprKind::IncDec {
                target: Place::Scalar(_),
                ..
            } => "increment/decrement",
            ExprKind::IncDec {
                target: Place::Element { .. },
                ..
            } => "array element increment/decrement",
            ExprKind::Seq { .. } => "sequence",
            ExprKind::While { .. } => "while loop",
            ExprKind::If { .. } => "if",
            ExprKind::Call { .. } => "function call",
            ExprKind::Empty => "empty statement",
        }
    }
}
