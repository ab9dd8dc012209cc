//! Function definitions and the registry that resolves calls by name.

use rustc_hash::FxHashMap;

use crate::{ExprId, VarId};

/// One declared parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Param {
    /// Bound by value from the evaluated argument expression.
    Scalar(VarId),
    /// Bound by copying the caller's array into the callee's frame.
    Array(VarId),
}

impl Param {
    pub const fn var(self) -> VarId {
        match self {
            Param::Scalar(var) | Param::Array(var) => var,
        }
    }

    pub const fn is_array(self) -> bool {
        matches!(self, Param::Array(_))
    }
}

/// A user-defined function.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    pub body: ExprId,
}

impl FunctionDef {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Name → function definition.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionRegistry {
    functions: FxHashMap<String, FunctionDef>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function, returning the definition it replaced, if any.
    pub fn register(&mut self, def: FunctionDef) -> Option<FunctionDef> {
        self.functions.insert(def.name.clone(), def)
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
