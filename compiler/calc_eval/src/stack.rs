//! The machine's explicit stacks.
//!
//! Growth goes through `try_reserve`, so running out of memory surfaces as
//! a resource-exhaustion fault instead of an abort.

use calc_ir::ExprId;

use crate::errors::{depth_limit_exceeded, internal, out_of_memory, EvalResult};

/// What a continuation resumes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Task {
    /// The synthetic call of the entry function. Returning from it ends the run.
    Entry,
    /// An expression node.
    Expr(ExprId),
}

/// Make room for one more element.
pub(crate) fn reserve_one<T>(values: &mut Vec<T>, what: &'static str) -> EvalResult<()> {
    if values.len() == values.capacity() {
        values.try_reserve(1).map_err(|_| out_of_memory(what))?;
    }
    Ok(())
}

/// Pending `(resume phase, task)` pairs.
///
/// Phases and tasks live in two parallel vectors that always have the same
/// length.
#[derive(Debug, Default)]
pub struct ContinuationStack {
    phases: Vec<u32>,
    tasks: Vec<Task>,
    limit: Option<usize>,
}

impl ContinuationStack {
    pub fn new(limit: Option<usize>) -> Self {
        ContinuationStack {
            phases: Vec::new(),
            tasks: Vec::new(),
            limit,
        }
    }

    /// Save a continuation.
    pub fn push(&mut self, phase: u32, task: Task) -> EvalResult<()> {
        if let Some(limit) = self.limit {
            if self.tasks.len() >= limit {
                return Err(depth_limit_exceeded(limit));
            }
        }
        reserve_one(&mut self.phases, "continuation stack")?;
        reserve_one(&mut self.tasks, "continuation stack")?;
        self.phases.push(phase);
        self.tasks.push(task);
        Ok(())
    }

    /// Take the most recent continuation.
    pub fn pop(&mut self) -> Option<(u32, Task)> {
        match (self.phases.pop(), self.tasks.pop()) {
            (Some(phase), Some(task)) => Some((phase, task)),
            _ => None,
        }
    }

    pub fn depth(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Intermediate values. Every finished node leaves exactly one.
#[derive(Debug, Default)]
pub struct DataStack {
    values: Vec<f64>,
}

impl DataStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) -> EvalResult<()> {
        reserve_one(&mut self.values, "data stack")?;
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> EvalResult<f64> {
        self.values
            .pop()
            .ok_or_else(|| internal("data stack underflow"))
    }

    /// The top value, left in place.
    pub fn peek(&self) -> EvalResult<f64> {
        self.values
            .last()
            .copied()
            .ok_or_else(|| internal("data stack underflow"))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
