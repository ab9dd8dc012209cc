//! SSA construction errors.

use calc_ir::{ExprId, FaultCategory};

pub type SsaResult<T> = Result<T, SsaError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SsaErrorKind {
    #[error("{construct} is not supported in SSA form")]
    UnsupportedConstruct { construct: &'static str },
    #[error("undefined function `{name}`")]
    UndefinedFunction { name: String },
    #[error("unknown variable id {id}")]
    UnknownVariable { id: u32 },
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl SsaErrorKind {
    pub fn category(&self) -> FaultCategory {
        match self {
            Self::UnsupportedConstruct { .. } => FaultCategory::UnsupportedConstruct,
            Self::UndefinedFunction { .. } | Self::UnknownVariable { .. } => FaultCategory::Lookup,
            Self::Internal { .. } => FaultCategory::InternalConsistency,
        }
    }
}

/// A construction fault and the node it was raised at.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{category}: {kind}{location}", category = .kind.category(), location = expr_suffix(.expr))]
pub struct SsaError {
    pub kind: SsaErrorKind,
    pub expr: Option<ExprId>,
}

impl SsaError {
    #[inline]
    pub fn category(&self) -> FaultCategory {
        self.kind.category()
    }
}

fn expr_suffix(expr: &Option<ExprId>) -> String {
    expr.map(|id| format!(" (at {id})")).unwrap_or_default()
}

#[cold]
pub(crate) fn unsupported(expr: ExprId, construct: &'static str) -> SsaError {
    SsaError {
        kind: SsaErrorKind::UnsupportedConstruct { construct },
        expr: Some(expr),
    }
}

#[cold]
pub(crate) fn undefined_function(name: &str) -> SsaError {
    SsaError {
        kind: SsaErrorKind::UndefinedFunction {
            name: name.to_owned(),
        },
        expr: None,
    }
}

#[cold]
pub(crate) fn unknown_variable(expr: ExprId, id: u32) -> SsaError {
    SsaError {
        kind: SsaErrorKind::UnknownVariable { id },
        expr: Some(expr),
    }
}

#[cold]
pub(crate) fn internal(expr: ExprId, message: impl Into<String>) -> SsaError {
    SsaError {
        kind: SsaErrorKind::Internal {
            message: message.into(),
        },
        expr: Some(expr),
    }
}
