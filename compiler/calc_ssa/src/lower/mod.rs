//! Lowering a function body to unversioned three-address SSA.
//!
//! Each builder owns its temporary counter, so independent builders produce
//! independent, reproducible numbering.

use rustc_hash::FxHashMap;
use smallvec::smallvec;

use calc_ir::{ExprId, ExprKind, FunctionDef, Param, Place, Program, Symbol, VarId};

use crate::errors::{internal, undefined_function, unknown_variable, unsupported, SsaResult};
use crate::rename::rename;
use crate::stack::ensure_sufficient_stack;
use crate::{SsaExpr, SsaInst, SsaList, SsaOperand, SsaVar};

/// Lowers function bodies of one [`Program`] to SSA.
pub struct SsaBuilder<'a> {
    program: &'a Program,
    next_temp: u32,
}

impl<'a> SsaBuilder<'a> {
    pub fn new(program: &'a Program) -> Self {
        SsaBuilder {
            program,
            next_temp: 0,
        }
    }

    /// Look up `name` and build it.
    pub fn build_function(&mut self, name: &str) -> SsaResult<SsaList> {
        let program = self.program;
        let def = program
            .function(name)
            .ok_or_else(|| undefined_function(name))?;
        self.build(def)
    }

    /// Lower and rename the body of `def`.
    ///
    /// Scalar parameters enter as version 0.
    pub fn build(&mut self, def: &FunctionDef) -> SsaResult<SsaList> {
        tracing::debug!(function = %def.name, "build ssa");
        let mut params = Vec::with_capacity(def.params.len());
        for param in &def.params {
            match *param {
                Param::Scalar(var) => params.push(self.symbol(def.body, var)?.name.as_str()),
                Param::Array(_) => return Err(unsupported(def.body, "array parameter")),
            }
        }

        let base = self.next_temp;
        let mut list = SsaList::new();
        self.lower(def.body, &mut list)?;
        Ok(rename(renumber_temps(list, base), &params))
    }

    /// Number of temporaries handed out so far.
    pub fn temps_allocated(&self) -> u32 {
        self.next_temp
    }

    fn fresh_temp(&mut self) -> SsaVar {
        let temp = SsaVar::Temp(self.next_temp);
        self.next_temp += 1;
        temp
    }

    fn symbol(&self, at: ExprId, var: VarId) -> SsaResult<&'a Symbol> {
        self.program
            .symbols
            .get(var)
            .ok_or_else(|| unknown_variable(at, var.raw()))
    }

    /// The SSA name of a scalar source variable.
    fn scalar(&self, at: ExprId, var: VarId) -> SsaResult<SsaVar> {
        let symbol = self.symbol(at, var)?;
        if symbol.is_array() {
            return Err(unsupported(at, "array variable"));
        }
        Ok(SsaVar::user(symbol.name.as_str()))
    }

    /// Lower `id` into `out`; yields the operand holding its value, if any.
    ///
    /// Statements (`if`, empty) yield `None`.
    fn lower(&mut self, id: ExprId, out: &mut SsaList) -> SsaResult<Option<SsaOperand>> {
        ensure_sufficient_stack(|| self.lower_inner(id, out))
    }

    fn lower_inner(&mut self, id: ExprId, out: &mut SsaList) -> SsaResult<Option<SsaOperand>> {
        let kind = *self
            .program
            .expr(id)
            .ok_or_else(|| internal(id, "dangling expression id"))?;

        match kind {
            ExprKind::Number(value) => Ok(Some(SsaOperand::Const(value))),
            ExprKind::Variable(var) => Ok(Some(SsaOperand::Var(self.scalar(id, var)?))),
            ExprKind::Empty => Ok(None),

            ExprKind::Unary { op, operand } => {
                let operand = self.value(operand, out)?;
                let dest = self.fresh_temp();
                out.push(SsaInst::Assign {
                    dest: dest.clone(),
                    value: SsaExpr::Unary { op, operand },
                });
                Ok(Some(SsaOperand::Var(dest)))
            }

            // Right operand first, as the interpreter evaluates it.
            ExprKind::Binary { op, left, right } => {
                let right = self.value(right, out)?;
                let mark = out.len();
                let left = self.value(left, out)?;
                let right = self.pin(right, mark, out);
                let dest = self.fresh_temp();
                out.push(SsaInst::Assign {
                    dest: dest.clone(),
                    value: SsaExpr::Binary { op, left, right },
                });
                Ok(Some(SsaOperand::Var(dest)))
            }

            ExprKind::Assign {
                target: Place::Scalar(var),
                value,
            } => {
                let dest = self.scalar(id, var)?;
                self.lower_into(value, dest.clone(), out)?;
                Ok(Some(SsaOperand::Var(dest)))
            }

            ExprKind::IncDec {
                op,
                target: Place::Scalar(var),
            } => {
                let target = self.scalar(id, var)?;
                let step = SsaExpr::Binary {
                    op: op.binary_op(),
                    left: SsaOperand::Var(target.clone()),
                    right: SsaOperand::Const(1.0),
                };
                if op.is_postfix() {
                    let old = self.fresh_temp();
                    out.push(SsaInst::Assign {
                        dest: old.clone(),
                        value: SsaExpr::Copy(SsaOperand::Var(target.clone())),
                    });
                    out.push(SsaInst::Assign {
                        dest: target,
                        value: step,
                    });
                    Ok(Some(SsaOperand::Var(old)))
                } else {
                    out.push(SsaInst::Assign {
                        dest: target.clone(),
                        value: step,
                    });
                    Ok(Some(SsaOperand::Var(target)))
                }
            }

            ExprKind::Ternary {
                cond,
                then_expr,
                else_expr,
            } => {
                let dest = self.lower_ternary(cond, then_expr, else_expr, None, out)?;
                Ok(Some(SsaOperand::Var(dest)))
            }

            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond = self.value(cond, out)?;
                let mut then_arm = SsaList::new();
                self.lower(then_branch, &mut then_arm)?;
                let mut else_arm = SsaList::new();
                self.lower(else_branch, &mut else_arm)?;
                out.push(SsaInst::Branch {
                    cond,
                    then_arm,
                    else_arm,
                });
                Ok(None)
            }

            ExprKind::Seq { first, second } => {
                self.lower(first, out)?;
                self.lower(second, out)
            }

            ExprKind::Assign {
                target: Place::Element { .. },
                ..
            }
            | ExprKind::IncDec {
                target: Place::Element { .. },
                ..
            }
            | ExprKind::Index { .. }
            | ExprKind::While { .. }
            | ExprKind::Call { .. } => Err(unsupported(id, kind.describe())),
        }
    }

    /// Lower `id` where a value is required.
    fn value(&mut self, id: ExprId, out: &mut SsaList) -> SsaResult<SsaOperand> {
        self.lower(id, out)?
            .ok_or_else(|| internal(id, "statement used where a value is required"))
    }

    /// Keep a user-variable read made before `mark` from seeing writes that
    /// were emitted after it: copy it into a temporary at `mark`.
    fn pin(&mut self, operand: SsaOperand, mark: usize, out: &mut SsaList) -> SsaOperand {
        let SsaOperand::Var(var @ SsaVar::User { .. }) = operand else {
            return operand;
        };
        let written = var
            .name()
            .is_some_and(|name| out.writes_to_since(mark, name));
        if !written {
            return SsaOperand::Var(var);
        }
        let temp = self.fresh_temp();
        out.insert(
            mark,
            SsaInst::Assign {
                dest: temp.clone(),
                value: SsaExpr::Copy(SsaOperand::Var(var)),
            },
        );
        SsaOperand::Var(temp)
    }

    /// Lower `id` and store its value in `dest`.
    ///
    /// A ternary merges straight into `dest` instead of through a temporary.
    fn lower_into(&mut self, id: ExprId, dest: SsaVar, out: &mut SsaList) -> SsaResult<()> {
        if let Some(&ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        }) = self.program.expr(id)
        {
            self.lower_ternary(cond, then_expr, else_expr, Some(dest), out)?;
            return Ok(());
        }
        let value = self.value(id, out)?;
        out.push(SsaInst::Assign {
            dest,
            value: SsaExpr::Copy(value),
        });
        Ok(())
    }

    /// Emit the branch for `cond ? then_expr : else_expr` and the phi merging
    /// the arm values into `dest` (a fresh temporary when `None`).
    fn lower_ternary(
        &mut self,
        cond: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        dest: Option<SsaVar>,
        out: &mut SsaList,
    ) -> SsaResult<SsaVar> {
        let cond = self.value(cond, out)?;
        let mut then_arm = SsaList::new();
        let then_value = self.arm_value(then_expr, &mut then_arm)?;
        let mut else_arm = SsaList::new();
        let else_value = self.arm_value(else_expr, &mut else_arm)?;
        out.push(SsaInst::Branch {
            cond,
            then_arm,
            else_arm,
        });
        let dest = dest.unwrap_or_else(|| self.fresh_temp());
        out.push(SsaInst::Phi {
            dest: dest.clone(),
            sources: smallvec![then_value, else_value],
        });
        Ok(dest)
    }

    /// Lower one ternary arm so its value ends up in a temporary of that arm.
    fn arm_value(&mut self, id: ExprId, arm: &mut SsaList) -> SsaResult<SsaVar> {
        match self.value(id, arm)? {
            SsaOperand::Var(temp @ SsaVar::Temp(_)) => Ok(temp),
            value => {
                let temp = self.fresh_temp();
                arm.push(SsaInst::Assign {
                    dest: temp.clone(),
                    value: SsaExpr::Copy(value),
                });
                Ok(temp)
            }
        }
    }
}

/// Temporary id as allocated → id in emission order.
type TempOrder = FxHashMap<u32, u32>;

/// Renumber temporaries from `base` in the order their definitions appear.
///
/// A pinned copy is allocated after the temporaries it is placed in front of.
fn renumber_temps(list: SsaList, base: u32) -> SsaList {
    let mut order = TempOrder::default();
    let mut next = base;
    for inst in list.walk() {
        if let SsaInst::Assign {
            dest: SsaVar::Temp(temp),
            ..
        }
        | SsaInst::Phi {
            dest: SsaVar::Temp(temp),
            ..
        } = inst
        {
            order.entry(*temp).or_insert_with(|| {
                let id = next;
                next += 1;
                id
            });
        }
    }
    if order.iter().all(|(from, to)| from == to) {
        return list;
    }
    relabel_list(list, &order)
}

fn relabel_list(list: SsaList, order: &TempOrder) -> SsaList {
    ensure_sufficient_stack(|| {
        list.into_iter()
            .map(|inst| relabel_inst(inst, order))
            .collect::<Vec<_>>()
            .into()
    })
}

fn relabel_inst(inst: SsaInst, order: &TempOrder) -> SsaInst {
    match inst {
        SsaInst::Assign { dest, value } => SsaInst::Assign {
            dest: relabel_var(dest, order),
            value: match value {
                SsaExpr::Copy(operand) => SsaExpr::Copy(relabel_operand(operand, order)),
                SsaExpr::Unary { op, operand } => SsaExpr::Unary {
                    op,
                    operand: relabel_operand(operand, order),
                },
                SsaExpr::Binary { op, left, right } => SsaExpr::Binary {
                    op,
                    left: relabel_operand(left, order),
                    right: relabel_operand(right, order),
                },
            },
        },
        SsaInst::Phi { dest, sources } => SsaInst::Phi {
            dest: relabel_var(dest, order),
            sources: sources
                .into_iter()
                .map(|var| relabel_var(var, order))
                .collect(),
        },
        SsaInst::Branch {
            cond,
            then_arm,
            else_arm,
        } => SsaInst::Branch {
            cond: relabel_operand(cond, order),
            then_arm: relabel_list(then_arm, order),
            else_arm: relabel_list(else_arm, order),
        },
    }
}

fn relabel_operand(operand: SsaOperand, order: &TempOrder) -> SsaOperand {
    match operand {
        SsaOperand::Var(var) => SsaOperand::Var(relabel_var(var, order)),
        constant @ SsaOperand::Const(_) => constant,
    }
}

fn relabel_var(var: SsaVar, order: &TempOrder) -> SsaVar {
    match var {
        SsaVar::Temp(temp) => SsaVar::Temp(order.get(&temp).copied().unwrap_or(temp)),
        user @ SsaVar::User { .. } => user,
    }
}
