//! The step loop.
//!
//! A node runs in phases. Phase 0 is entered fresh; each time the node hands
//! control to a child it saves `(resume phase, node)` on the continuation
//! stack, and the child's completion pops it back. A node completes by
//! leaving exactly one value on the data stack.
//!
//! Children are evaluated in this order:
//! - binary operators: right operand, then left
//! - assignment and increment/decrement of an element: value, then index
//! - calls: scalar arguments left to right; array arguments are copied at entry

use calc_ir::{
    is_zero, ExprId, ExprKind, FunctionDef, IncDecOp, Place, Program, Symbol, VarId,
};

use crate::errors::{
    index_out_of_bounds, index_too_large, internal, invalid_index, negative_index,
    uninitialized_variable, unknown_variable, EvalError, EvalResult,
};
use crate::stack::reserve_one;
use crate::{
    evaluate_binary, evaluate_unary, format_value, ContinuationStack, DataStack, EvalLimits,
    Frame, Task, TraceHandlerImpl,
};

/// A frame together with the function that owns it.
pub(super) struct CallFrame<'a> {
    pub(super) function: &'a FunctionDef,
    pub(super) vars: Frame,
}

/// State of one run.
pub(super) struct Machine<'a> {
    pub(super) program: &'a Program,
    trace: &'a TraceHandlerImpl,
    /// Returning from any call to this function ends the run.
    entry: &'a str,
    pub(super) current: Task,
    pub(super) phase: u32,
    conts: ContinuationStack,
    pub(super) data: DataStack,
    pub(super) frames: Vec<CallFrame<'a>>,
    finished: Option<f64>,
}

impl<'a> Machine<'a> {
    /// Set up a run whose first step is the body of `entry`.
    pub(super) fn start(
        program: &'a Program,
        trace: &'a TraceHandlerImpl,
        limits: EvalLimits,
        entry: &'a str,
        function: &'a FunctionDef,
        vars: Frame,
    ) -> EvalResult<Self> {
        let mut machine = Machine {
            program,
            trace,
            entry,
            current: Task::Entry,
            phase: 0,
            conts: ContinuationStack::new(limits.max_depth),
            data: DataStack::new(),
            frames: Vec::new(),
            finished: None,
        };
        machine.push_frame(function, vars, 1)?;
        Ok(machine)
    }

    /// Step until a call of the entry function returns.
    pub(super) fn run(mut self) -> EvalResult {
        loop {
            let step = match self.current {
                Task::Entry => self.step_entry(),
                Task::Expr(id) => self.step_expr(id),
            };
            if let Err(err) = step {
                return Err(self.locate(err));
            }
            if let Some(result) = self.finished {
                return Ok(result);
            }
        }
    }

    fn locate(&self, err: EvalError) -> EvalError {
        let function = self.frames.last().map(|f| f.function.name.as_str());
        let expr = match self.current {
            Task::Expr(id) => Some(id),
            Task::Entry => None,
        };
        err.at(function, expr)
    }

    // Control transfer

    /// Save `(resume, current)` and start evaluating `child`.
    pub(super) fn descend(&mut self, resume: u32, child: ExprId) -> EvalResult<()> {
        self.conts.push(resume, self.current)?;
        self.current = Task::Expr(child);
        self.phase = 0;
        Ok(())
    }

    /// Finish the current node; its value is already on the data stack.
    pub(super) fn complete(&mut self) -> EvalResult<()> {
        let (phase, task) = self
            .conts
            .pop()
            .ok_or_else(|| internal("continuation stack underflow"))?;
        self.current = task;
        self.phase = phase;
        Ok(())
    }

    /// Finish the current node with `value`.
    pub(super) fn produce(&mut self, value: f64) -> EvalResult<()> {
        self.data.push(value)?;
        self.complete()
    }

    /// Stop the run with `result` as the program value.
    pub(super) fn finish(&mut self, result: f64) {
        self.finished = Some(result);
    }

    pub(super) fn is_entry(&self, function: &FunctionDef) -> bool {
        function.name == self.entry
    }

    /// Push a callee frame and jump into its body.
    ///
    /// `resume` is the phase the current task continues at once the body
    /// completes.
    pub(super) fn push_frame(
        &mut self,
        function: &'a FunctionDef,
        vars: Frame,
        resume: u32,
    ) -> EvalResult<()> {
        self.conts.push(resume, self.current)?;
        reserve_one(&mut self.frames, "frame stack")?;
        self.frames.push(CallFrame { function, vars });
        tracing::debug!(function = %function.name, depth = self.frames.len(), "call");
        self.current = Task::Expr(function.body);
        self.phase = 0;
        Ok(())
    }

    fn step_entry(&mut self) -> EvalResult<()> {
        match self.phase {
            1 => {
                let result = self.pop_frame()?;
                self.finish(result);
                Ok(())
            }
            phase => Err(internal(format!("invalid phase {phase} for entry"))),
        }
    }

    fn step_expr(&mut self, id: ExprId) -> EvalResult<()> {
        let kind = *self
            .program
            .expr(id)
            .ok_or_else(|| internal(format!("dangling expression {id}")))?;
        let phase = self.phase;
        tracing::trace!(expr = %id, phase, kind = kind.describe(), "step");

        match kind {
            ExprKind::Number(value) => self.produce(value),
            ExprKind::Variable(var) => {
                let value = self.read_scalar(var)?;
                self.produce(value)
            }
            ExprKind::Empty => self.produce(0.0),

            ExprKind::Unary { op, operand } => match phase {
                0 => self.descend(1, operand),
                1 => {
                    let value = self.data.pop()?;
                    self.produce(evaluate_unary(value, op))
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Binary { op, left, right } => match phase {
                0 => self.descend(1, right),
                1 => self.descend(2, left),
                2 => {
                    let left = self.data.pop()?;
                    let right = self.data.pop()?;
                    self.produce(evaluate_binary(left, right, op)?)
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Assign { target, value } => match (phase, target) {
                (0, _) => self.descend(1, value),
                (1, Place::Scalar(var)) => {
                    let value = self.data.peek()?;
                    self.store_scalar(var, value)?;
                    self.complete()
                }
                (1, Place::Element { index, .. }) => self.descend(2, index),
                (2, Place::Element { array, .. }) => {
                    let index = self.data.pop()?;
                    let value = self.data.peek()?;
                    let (symbol, slot) = self.element_slot(array, index)?;
                    self.write_element(array, symbol, slot, value)?;
                    self.complete()
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Index { array, index } => match phase {
                0 => self.descend(1, index),
                1 => {
                    let index = self.data.pop()?;
                    let (symbol, slot) = self.element_slot(array, index)?;
                    let value = self.read_element(array, symbol, slot)?;
                    self.produce(value)
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::IncDec { op, target } => match (phase, target) {
                (0, Place::Scalar(var)) => {
                    let old = self.read_scalar(var)?;
                    let new = old + op.delta();
                    self.store_scalar(var, new)?;
                    self.produce(inc_dec_value(op, old, new))
                }
                (0, Place::Element { index, .. }) => self.descend(1, index),
                (1, Place::Element { array, .. }) => {
                    let index = self.data.pop()?;
                    let (symbol, slot) = self.element_slot(array, index)?;
                    let old = self.read_element(array, symbol, slot)?;
                    let new = old + op.delta();
                    self.write_element(array, symbol, slot, new)?;
                    self.produce(inc_dec_value(op, old, new))
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Ternary {
                cond,
                then_expr: then_arm,
                else_expr: else_arm,
            }
            | ExprKind::If {
                cond,
                then_branch: then_arm,
                else_branch: else_arm,
            } => match phase {
                0 => self.descend(1, cond),
                1 => {
                    let cond = self.data.pop()?;
                    let arm = if is_zero(cond) { else_arm } else { then_arm };
                    self.descend(2, arm)
                }
                2 => self.complete(),
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Seq { first, second } => match phase {
                0 => self.descend(1, first),
                1 => {
                    self.data.pop()?;
                    self.descend(2, second)
                }
                2 => self.complete(),
                _ => Err(bad_phase(phase, &kind)),
            },

            // The data stack holds the last body value (0 before any
            // iteration) while the condition is evaluated.
            ExprKind::While { cond, body } => match phase {
                0 => {
                    self.data.push(0.0)?;
                    self.descend(1, cond)
                }
                1 => {
                    let cond = self.data.pop()?;
                    if is_zero(cond) {
                        self.complete()
                    } else {
                        self.descend(2, body)
                    }
                }
                2 => {
                    let value = self.data.pop()?;
                    self.data.pop()?;
                    self.data.push(value)?;
                    self.descend(1, cond)
                }
                _ => Err(bad_phase(phase, &kind)),
            },

            ExprKind::Call { callee, args } => self.step_call(callee, args),
        }
    }

    // Variables

    pub(super) fn frame(&self) -> EvalResult<&CallFrame<'a>> {
        self.frames
            .last()
            .ok_or_else(|| internal("no active frame"))
    }

    fn vars_mut(&mut self) -> EvalResult<&mut Frame> {
        self.frames
            .last_mut()
            .map(|f| &mut f.vars)
            .ok_or_else(|| internal("no active frame"))
    }

    pub(super) fn symbol(&self, var: VarId) -> EvalResult<&'a Symbol> {
        self.program
            .symbols
            .get(var)
            .ok_or_else(|| unknown_variable(var.raw()))
    }

    fn read_scalar(&self, var: VarId) -> EvalResult<f64> {
        let symbol = self.symbol(var)?;
        self.frame()?
            .vars
            .scalar(var)
            .ok_or_else(|| uninitialized_variable(&symbol.name))
    }

    fn store_scalar(&mut self, var: VarId, value: f64) -> EvalResult<()> {
        let symbol = self.symbol(var)?;
        self.vars_mut()?.set_scalar(var, value)?;
        self.emit(|| format!("{} = {}", symbol.name, format_value(value)));
        Ok(())
    }

    /// Validate an index against the array's declared length.
    ///
    /// Runs before any store, so a faulting store leaves the array untouched.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "index is checked non-negative and at most u32::MAX"
    )]
    fn element_slot(&self, array: VarId, index: f64) -> EvalResult<(&'a Symbol, usize)> {
        let symbol = self.symbol(array)?;
        if index.is_nan() {
            return Err(invalid_index(&symbol.name));
        }
        if index < 0.0 {
            return Err(negative_index(&symbol.name, index));
        }
        if index > f64::from(u32::MAX) {
            return Err(index_too_large(&symbol.name, index));
        }
        let slot = index.trunc() as usize;
        let len = symbol.len as usize;
        if slot >= len {
            return Err(index_out_of_bounds(&symbol.name, slot, len));
        }
        Ok((symbol, slot))
    }

    fn read_element(&mut self, array: VarId, symbol: &Symbol, slot: usize) -> EvalResult<f64> {
        let values = self.vars_mut()?.array_mut(array, symbol.len as usize)?;
        values
            .get(slot)
            .copied()
            .ok_or_else(|| internal(format!("array `{}` shorter than declared", symbol.name)))
    }

    fn write_element(
        &mut self,
        array: VarId,
        symbol: &Symbol,
        slot: usize,
        value: f64,
    ) -> EvalResult<()> {
        let values = self.vars_mut()?.array_mut(array, symbol.len as usize)?;
        let cell = values
            .get_mut(slot)
            .ok_or_else(|| internal(format!("array `{}` shorter than declared", symbol.name)))?;
        *cell = value;
        self.emit(|| format!("{}[{slot}] = {}", symbol.name, format_value(value)));
        Ok(())
    }

    fn emit(&self, line: impl FnOnce() -> String) {
        if !self.trace.is_silent() {
            self.trace.record(&line());
        }
    }
}

fn inc_dec_value(op: IncDecOp, old: f64, new: f64) -> f64 {
    if op.is_postfix() {
        old
    } else {
        new
    }
}

#[cold]
fn bad_phase(phase: u32, kind: &ExprKind) -> EvalError {
    internal(format!("invalid phase {phase} for {}", kind.describe()))
}
