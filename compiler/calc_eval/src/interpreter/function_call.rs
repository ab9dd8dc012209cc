//! Calls: argument evaluation, frame entry and return.
//!
//! A call to a function with `n` parameters runs in phases `0..=n+1`.
//! Phases `0..=n` walk the parameter list: phase `k` evaluates the first
//! scalar argument at position `>= k` and resumes just past it. Once none is
//! left the callee frame is entered, resuming the call at `n + 1`, where the
//! callee's `result` replaces the body value. A call of the entry function
//! ends the whole run with that value instead.

use calc_ir::{ExprId, ExprKind, ExprRange, FunctionDef, Name, Param, VarId, RESULT_VAR};

use super::machine::Machine;
use crate::errors::{
    arity_mismatch, array_argument_expected, array_size_mismatch, internal, missing_result,
    undefined_function, EvalResult,
};
use crate::Frame;

impl<'a> Machine<'a> {
    pub(super) fn step_call(&mut self, callee: Name, args: ExprRange) -> EvalResult<()> {
        let program = self.program;
        let name = program
            .names
            .lookup(callee)
            .ok_or_else(|| internal(format!("unknown function name {}", callee.raw())))?;
        let def = program
            .function(name)
            .ok_or_else(|| undefined_function(name))?;
        let arg_ids = program
            .arena
            .list(args)
            .ok_or_else(|| internal("argument list out of range"))?;
        if arg_ids.len() != def.arity() {
            return Err(arity_mismatch(name, def.arity(), arg_ids.len()));
        }
        let return_phase = u32::try_from(def.arity())
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| internal("too many parameters"))?;

        let phase = self.phase;
        if phase < return_phase {
            let next_scalar = def
                .params
                .iter()
                .enumerate()
                .skip(phase as usize)
                .find(|(_, param)| !param.is_array())
                .map(|(position, _)| position);
            match next_scalar {
                Some(position) => {
                    let resume = u32::try_from(position + 1)
                        .map_err(|_| internal("too many parameters"))?;
                    self.descend(resume, arg_ids[position])
                }
                None => self.enter(def, arg_ids, return_phase),
            }
        } else if phase == return_phase {
            let result = self.pop_frame()?;
            if self.is_entry(def) {
                tracing::debug!(function = name, "entry returned, run ends");
                self.finish(result);
                Ok(())
            } else {
                self.produce(result)
            }
        } else {
            Err(internal(format!("invalid phase {phase} for call")))
        }
    }

    /// Bind the evaluated arguments into a fresh frame and jump into `def`.
    ///
    /// Scalar argument values sit on the data stack in parameter order.
    fn enter(&mut self, def: &'a FunctionDef, arg_ids: &[ExprId], resume: u32) -> EvalResult<()> {
        let mut vars = Frame::new();
        for (position, (&param, &arg)) in def.params.iter().zip(arg_ids).enumerate().rev() {
            match param {
                Param::Scalar(var) => {
                    let value = self.data.pop()?;
                    vars.set_scalar(var, value)?;
                }
                Param::Array(var) => {
                    let values = self.array_argument(def, position, arg, var)?;
                    vars.insert_array(var, values)?;
                }
            }
        }
        self.push_frame(def, vars, resume)
    }

    /// Copy the caller's array named by `arg` for the array parameter `param`.
    fn array_argument(
        &self,
        def: &FunctionDef,
        position: usize,
        arg: ExprId,
        param: VarId,
    ) -> EvalResult<Vec<f64>> {
        let Some(&ExprKind::Variable(source)) = self.program.expr(arg) else {
            return Err(array_argument_expected(&def.name, position));
        };
        let source_len = self.symbol(source)?.len as usize;
        let param_len = self.symbol(param)?.len as usize;
        if source_len != param_len {
            return Err(array_size_mismatch(&def.name, param_len, source_len));
        }
        self.frame()?.vars.array_snapshot(source, source_len)
    }

    /// Pop the callee frame and the body value; yield the callee's `result`.
    pub(super) fn pop_frame(&mut self) -> EvalResult<f64> {
        let frame = self
            .frames
            .pop()
            .ok_or_else(|| internal("frame stack underflow"))?;
        let name = frame.function.name.as_str();
        let symbols = &self.program.symbols;
        let result = frame
            .vars
            .scalars()
            .find(|&(var, _)| symbols.name(var) == Some(RESULT_VAR))
            .map(|(_, value)| value)
            .ok_or_else(|| missing_result(name).at(Some(name), None))?;
        self.data.pop()?;
        tracing::debug!(function = name, result = %result, "return");
        Ok(result)
    }
}
