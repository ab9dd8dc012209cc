//! Evaluation errors.
//!
//! Every fault the interpreter can raise is an [`EvalErrorKind`]; each kind
//! maps to exactly one [`FaultCategory`]. The machine attaches a
//! [`FaultSite`] (function and node) as the error leaves the step loop, so
//! factory functions only describe *what* went wrong.

use std::fmt;

use calc_ir::{ExprId, FaultCategory};

/// Result alias used throughout the interpreter.
pub type EvalResult<T = f64> = Result<T, EvalError>;

/// What went wrong.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum EvalErrorKind {
    // Lookup
    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },
    #[error("variable `{name}` read before it was assigned")]
    UninitializedVariable { name: String },
    #[error("unknown variable id {id}")]
    UnknownVariable { id: u32 },
    #[error("function `{function}` returned without assigning `result`")]
    MissingResult { function: String },

    // Arity
    #[error("function `{function}` expects {expected} argument(s), got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    #[error("argument {position} of `{function}` must name an array")]
    ArrayArgumentExpected { function: String, position: usize },
    #[error("argument {position} of `{function}` must be a scalar")]
    ScalarArgumentExpected { function: String, position: usize },
    #[error("array parameter of `{function}` has length {expected}, argument has length {got}")]
    ArraySizeMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    // Range
    #[error("index {index} into `{array}` is negative")]
    NegativeIndex { array: String, index: f64 },
    #[error("index into `{array}` is not a number")]
    InvalidIndex { array: String },
    #[error("index {index} into `{array}` is too large")]
    IndexTooLarge { array: String, index: f64 },
    #[error("index {index} out of bounds for `{array}` of length {len}")]
    IndexOutOfBounds { array: String, index: usize, len: usize },

    // Arithmetic
    #[error("division by zero")]
    DivisionByZero,

    // Internal consistency
    #[error("internal error: {message}")]
    Internal { message: String },

    // Resource exhaustion
    #[error("out of memory growing the {what}")]
    OutOfMemory { what: &'static str },
    #[error("evaluation depth limit of {limit} exceeded")]
    DepthLimitExceeded { limit: usize },
}

impl EvalErrorKind {
    /// The fault category this kind belongs to.
    pub fn category(&self) -> FaultCategory {
        match self {
            Self::UndefinedFunction { .. }
            | Self::UninitializedVariable { .. }
            | Self::UnknownVariable { .. }
            | Self::MissingResult { .. } => FaultCategory::Lookup,
            Self::ArityMismatch { .. }
            | Self::ArrayArgumentExpected { .. }
            | Self::ScalarArgumentExpected { .. }
            | Self::ArraySizeMismatch { .. } => FaultCategory::Arity,
            Self::NegativeIndex { .. }
            | Self::InvalidIndex { .. }
            | Self::IndexTooLarge { .. }
            | Self::IndexOutOfBounds { .. } => FaultCategory::Range,
            Self::DivisionByZero => FaultCategory::Arithmetic,
            Self::Internal { .. } => FaultCategory::InternalConsistency,
            Self::OutOfMemory { .. } | Self::DepthLimitExceeded { .. } => {
                FaultCategory::ResourceExhaustion
            }
        }
    }
}

/// Where a fault was raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FaultSite {
    /// Function whose frame was active.
    pub function: Option<String>,
    /// Node being stepped.
    pub expr: Option<ExprId>,
}

impl fmt::Display for FaultSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.function, self.expr) {
            (Some(function), Some(expr)) => write!(f, " (in `{function}` at {expr})"),
            (Some(function), None) => write!(f, " (in `{function}`)"),
            (None, Some(expr)) => write!(f, " (at {expr})"),
            (None, None) => Ok(()),
        }
    }
}

/// An evaluation fault, with the site it was raised at.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("{category}: {kind}{site}", category = .kind.category())]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub site: FaultSite,
}

impl EvalError {
    pub fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            site: FaultSite::default(),
        }
    }

    #[inline]
    pub fn category(&self) -> FaultCategory {
        self.kind.category()
    }

    /// Attach the site unless an inner step already did.
    #[must_use]
    pub fn at(mut self, function: Option<&str>, expr: Option<ExprId>) -> Self {
        if self.site.function.is_none() {
            self.site.function = function.map(str::to_owned);
        }
        if self.site.expr.is_none() {
            self.site.expr = expr;
        }
        self
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        EvalError::from_kind(kind)
    }
}

// Factory functions

#[cold]
pub fn undefined_function(name: &str) -> EvalError {
    EvalErrorKind::UndefinedFunction {
        name: name.to_owned(),
    }
    .into()
}

#[cold]
pub fn uninitialized_variable(name: &str) -> EvalError {
    EvalErrorKind::UninitializedVariable {
        name: name.to_owned(),
    }
    .into()
}

#[cold]
pub fn unknown_variable(id: u32) -> EvalError {
    EvalErrorKind::UnknownVariable { id }.into()
}

#[cold]
pub fn missing_result(function: &str) -> EvalError {
    EvalErrorKind::MissingResult {
        function: function.to_owned(),
    }
    .into()
}

#[cold]
pub fn arity_mismatch(function: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArityMismatch {
        function: function.to_owned(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn array_argument_expected(function: &str, position: usize) -> EvalError {
    EvalErrorKind::ArrayArgumentExpected {
        function: function.to_owned(),
        position,
    }
    .into()
}

#[cold]
pub fn scalar_argument_expected(function: &str, position: usize) -> EvalError {
    EvalErrorKind::ScalarArgumentExpected {
        function: function.to_owned(),
        position,
    }
    .into()
}

#[cold]
pub fn array_size_mismatch(function: &str, expected: usize, got: usize) -> EvalError {
    EvalErrorKind::ArraySizeMismatch {
        function: function.to_owned(),
        expected,
        got,
    }
    .into()
}

#[cold]
pub fn negative_index(array: &str, index: f64) -> EvalError {
    EvalErrorKind::NegativeIndex {
        array: array.to_owned(),
        index,
    }
    .into()
}

#[cold]
pub fn invalid_index(array: &str) -> EvalError {
    EvalErrorKind::InvalidIndex {
        array: array.to_owned(),
    }
    .into()
}

#[cold]
pub fn index_too_large(array: &str, index: f64) -> EvalError {
    EvalErrorKind::IndexTooLarge {
        array: array.to_owned(),
        index,
    }
    .into()
}

#[cold]
pub fn index_out_of_bounds(array: &str, index: usize, len: usize) -> EvalError {
    EvalErrorKind::IndexOutOfBounds {
        array: array.to_owned(),
        index,
        len,
    }
    .into()
}

#[cold]
pub fn division_by_zero() -> EvalError {
    EvalErrorKind::DivisionByZero.into()
}

#[cold]
pub fn internal(message: impl Into<String>) -> EvalError {
    EvalErrorKind::Internal {
        message: message.into(),
    }
    .into()
}

#[cold]
pub fn out_of_memory(what: &'static str) -> EvalError {
    EvalErrorKind::OutOfMemory { what }.into()
}

#[cold]
pub fn depth_limit_exceeded(limit: usize) -> EvalError {
    EvalErrorKind::DepthLimitExceeded { limit }.into()
}
