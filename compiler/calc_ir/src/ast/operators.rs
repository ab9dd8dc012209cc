//! Unary, binary and increment/decrement operators.

/// Binary operators.
///
/// Assignment and array indexing are not operators here: they have their own
/// node kinds (`ExprKind::Assign`, `ExprKind::Index`) so their operands can be
/// matched directly.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    /// Returns the source-level symbol for this operator.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
        }
    }

    /// Whether this operator always yields exactly 1.0 or 0.0.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

/// Increment and decrement, prefix and postfix.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncDecOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl IncDecOp {
    /// The amount added to the stored value (`1.0` or `-1.0`).
    pub const fn delta(self) -> f64 {
        match self {
            Self::PreInc | Self::PostInc => 1.0,
            Self::PreDec | Self::PostDec => -1.0,
        }
    }

    /// Postfix forms yield the value from before the update.
    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }

    /// The binary operator that applies the update.
    pub const fn binary_op(self) -> BinaryOp {
        match self {
            Self::PreInc | Self::PostInc => BinaryOp::Add,
            Self::PreDec | Self::PostDec => BinaryOp::Sub,
        }
    }
}
