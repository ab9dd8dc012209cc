//! Tree-walking interpreter driven by explicit stacks.
//!
//! [`Interpreter`] is the configured, reusable front; each
//! [`execute`](Interpreter::execute) builds a fresh [`Machine`] and runs it to
//! completion.

mod builder;
mod function_call;
mod machine;

pub use builder::InterpreterBuilder;

use calc_ir::{FunctionDef, Param, Program};

use crate::errors::{
    arity_mismatch, array_argument_expected, array_size_mismatch, scalar_argument_expected,
    undefined_function, unknown_variable, EvalResult,
};
use crate::{Frame, SharedTraceHandler};
use machine::Machine;

/// An argument handed to the entry function by the host.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgValue {
    Scalar(f64),
    /// Must match the array parameter's declared length.
    Array(Vec<f64>),
}

impl From<f64> for ArgValue {
    fn from(value: f64) -> Self {
        ArgValue::Scalar(value)
    }
}

impl From<Vec<f64>> for ArgValue {
    fn from(values: Vec<f64>) -> Self {
        ArgValue::Array(values)
    }
}

/// Resource limits for one run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EvalLimits {
    /// Maximum number of pending continuations. `None` is bounded by memory only.
    pub max_depth: Option<usize>,
}

/// Evaluates functions of one [`Program`].
pub struct Interpreter<'a> {
    program: &'a Program,
    trace: SharedTraceHandler,
    limits: EvalLimits,
    entry: String,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with the default configuration: stdout trace, no depth
    /// limit, entry `main`.
    pub fn new(program: &'a Program) -> Self {
        InterpreterBuilder::new(program).build()
    }

    pub fn program(&self) -> &'a Program {
        self.program
    }

    pub fn trace_handler(&self) -> &SharedTraceHandler {
        &self.trace
    }

    pub fn limits(&self) -> EvalLimits {
        self.limits
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Run the configured entry function without arguments.
    pub fn run(&self) -> EvalResult {
        self.execute(&self.entry, &[])
    }

    /// Run `entry` with `args` and return the value of its `result` variable.
    ///
    /// Every store along the way is reported to the trace handler. The run
    /// ends as soon as any call of the configured entry function returns,
    /// nested calls included.
    pub fn execute(&self, entry: &str, args: &[ArgValue]) -> EvalResult {
        tracing::debug!(entry, args = args.len(), "execute");
        let def = self
            .program
            .function(entry)
            .ok_or_else(|| undefined_function(entry))?;
        let vars = self
            .bind_entry_args(def, args)
            .map_err(|e| e.at(Some(entry), None))?;
        let result =
            Machine::start(self.program, &self.trace, self.limits, &self.entry, def, vars)?
                .run();
        match &result {
            Ok(value) => tracing::debug!(entry, result = %value, "finished"),
            Err(err) => tracing::debug!(entry, %err, "faulted"),
        }
        result
    }

    fn bind_entry_args(&self, def: &FunctionDef, args: &[ArgValue]) -> EvalResult<Frame> {
        if args.len() != def.arity() {
            return Err(arity_mismatch(&def.name, def.arity(), args.len()));
        }
        let mut vars = Frame::new();
        for (position, (&param, arg)) in def.params.iter().zip(args).enumerate() {
            match (param, arg) {
                (Param::Scalar(var), ArgValue::Scalar(value)) => vars.set_scalar(var, *value)?,
                (Param::Array(var), ArgValue::Array(values)) => {
                    let symbol = self
                        .program
                        .symbols
                        .get(var)
                        .ok_or_else(|| unknown_variable(var.raw()))?;
                    let len = symbol.len as usize;
                    if values.len() != len {
                        return Err(array_size_mismatch(&def.name, len, values.len()));
                    }
                    vars.insert_array(var, values.clone())?;
                }
                (Param::Scalar(_), ArgValue::Array(_)) => {
                    return Err(scalar_argument_expected(&def.name, position));
                }
                (Param::Array(_), ArgValue::Scalar(_)) => {
                    return Err(array_argument_expected(&def.name, position));
                }
            }
        }
        Ok(vars)
    }
}
