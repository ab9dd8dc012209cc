//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use calc_ir::{Program, ENTRY_FUNCTION};

use super::{EvalLimits, Interpreter};
use crate::{stdout_handler, SharedTraceHandler};

/// Builder for creating [`Interpreter`] instances.
///
/// Defaults: trace lines go to stdout, no depth limit, entry function `main`.
pub struct InterpreterBuilder<'a> {
    program: &'a Program,
    trace: Option<SharedTraceHandler>,
    limits: EvalLimits,
    entry: String,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            trace: None,
            limits: EvalLimits::default(),
            entry: ENTRY_FUNCTION.to_owned(),
        }
    }

    /// Where store trace lines go.
    #[must_use]
    pub fn trace_handler(mut self, handler: SharedTraceHandler) -> Self {
        self.trace = Some(handler);
        self
    }

    #[must_use]
    pub fn limits(mut self, limits: EvalLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Cap the number of pending continuations.
    #[must_use]
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.limits.max_depth = Some(depth);
        self
    }

    /// Function started by [`Interpreter::run`].
    #[must_use]
    pub fn entry(mut self, name: impl Into<String>) -> Self {
        self.entry = name.into();
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            program: self.program,
            trace: self.trace.unwrap_or_else(stdout_handler),
            limits: self.limits,
            entry: self.entry,
        }
    }
}
