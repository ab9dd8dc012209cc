//! Calc Eval - interpreter for the calc language.
//!
//! Evaluates a [`Program`](calc_ir::Program) starting from an entry function
//! and produces one `f64` result, reporting every variable or array store to
//! a [`TraceHandlerImpl`] as a `name = value` / `name[index] = value` line.
//!
//! # Architecture
//!
//! The evaluator never recurses on the host stack. It is a single loop over
//! an explicit state machine:
//!
//! - the *current node* and its integer *phase* (how many children have been
//!   evaluated, plus how much post-processing remains);
//! - a [`ContinuationStack`] of `(resume phase, node)` pairs, pushed when a
//!   node hands control to a child and popped when the child finishes;
//! - a [`DataStack`] of `f64`s: every finished node leaves exactly one value;
//! - a stack of call [`Frame`]s, one per in-flight function call.
//!
//! Recursion depth of the evaluated program is therefore bounded only by
//! heap memory (or by [`EvalLimits::max_depth`] when configured).

mod errors;
mod frame;
pub mod interpreter;
mod operators;
mod stack;
mod trace_handler;

pub use errors::{EvalError, EvalErrorKind, EvalResult, FaultSite};
pub use frame::Frame;
pub use interpreter::{ArgValue, EvalLimits, Interpreter, InterpreterBuilder};
pub use operators::{evaluate_binary, evaluate_unary, format_value};
pub use stack::{ContinuationStack, DataStack, Task};
pub use trace_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferTraceHandler, SharedTraceHandler,
    StdoutTraceHandler, TraceHandlerImpl,
};
