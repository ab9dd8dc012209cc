//! Version renaming and phi insertion.
//!
//! Two tables thread through the walk:
//! - `targets`: the latest version handed out per name, shared by all arms
//!   so versions stay unique across the whole function;
//! - `sources`: the version a read sees at this point, cloned per arm.
//!
//! After a branch the arm source tables are merged: a name whose versions
//! differ gets a phi, written as a fresh version; a name seen in only one
//! arm adopts that arm's version.

use rustc_hash::FxHashMap;
use smallvec::smallvec;

use crate::stack::ensure_sufficient_stack;
use crate::{SsaExpr, SsaInst, SsaList, SsaOperand, SsaVar};

type VersionTable = FxHashMap<String, u32>;

/// Version every user variable of `list`.
///
/// `live_in` names (parameters) start at version 0. Temporaries and names
/// that already carry a version are left alone.
pub fn rename(list: SsaList, live_in: &[&str]) -> SsaList {
    let mut targets = VersionTable::default();
    let mut sources = VersionTable::default();
    for &name in live_in {
        targets.insert(name.to_owned(), 0);
        sources.insert(name.to_owned(), 0);
    }
    rename_list(list, &mut targets, &mut sources)
}

fn rename_list(list: SsaList, targets: &mut VersionTable, sources: &mut VersionTable) -> SsaList {
    ensure_sufficient_stack(|| {
        let mut out = SsaList::new();
        for inst in list {
            match inst {
                SsaInst::Assign { dest, value } => {
                    let value = read_expr(value, targets, sources);
                    let dest = write(dest, targets, sources);
                    out.push(SsaInst::Assign { dest, value });
                }
                SsaInst::Phi { dest, sources: from } => {
                    let from = from
                        .into_iter()
                        .map(|var| read(var, targets, sources))
                        .collect();
                    let dest = write(dest, targets, sources);
                    out.push(SsaInst::Phi { dest, sources: from });
                }
                SsaInst::Branch {
                    cond,
                    then_arm,
                    else_arm,
                } => {
                    let cond = read_operand(cond, targets, sources);
                    let mut then_sources = sources.clone();
                    let then_arm = rename_list(then_arm, targets, &mut then_sources);
                    let mut else_sources = sources.clone();
                    let else_arm = rename_list(else_arm, targets, &mut else_sources);
                    out.push(SsaInst::Branch {
                        cond,
                        then_arm,
                        else_arm,
                    });
                    join(&then_sources, &else_sources, targets, sources, &mut out);
                }
            }
        }
        out
    })
}

/// Merge the arm tables back into `sources`, emitting phis for divergent names.
fn join(
    then_sources: &VersionTable,
    else_sources: &VersionTable,
    targets: &mut VersionTable,
    sources: &mut VersionTable,
    out: &mut SsaList,
) {
    let mut names: Vec<&String> = then_sources.keys().chain(else_sources.keys()).collect();
    names.sort_unstable();
    names.dedup();

    for name in names {
        match (then_sources.get(name), else_sources.get(name)) {
            (Some(&then_version), Some(&else_version)) if then_version != else_version => {
                let dest = write(SsaVar::user(name.as_str()), targets, sources);
                tracing::debug!(%dest, then_version, else_version, "insert phi");
                out.push(SsaInst::Phi {
                    dest,
                    sources: smallvec![
                        SsaVar::versioned(name.as_str(), then_version),
                        SsaVar::versioned(name.as_str(), else_version),
                    ],
                });
            }
            (Some(&version), _) | (None, Some(&version)) => {
                sources.insert(name.clone(), version);
            }
            (None, None) => {}
        }
    }
}

/// Allocate the next version for a written user variable.
fn write(var: SsaVar, targets: &mut VersionTable, sources: &mut VersionTable) -> SsaVar {
    match var {
        SsaVar::User {
            name,
            version: None,
        } => {
            let version = targets.get(&name).map_or(1, |latest| latest + 1);
            targets.insert(name.clone(), version);
            sources.insert(name.clone(), version);
            SsaVar::versioned(name, version)
        }
        other => other,
    }
}

/// Resolve a read to the current version. Unseen names are live-in at 0.
fn read(var: SsaVar, targets: &mut VersionTable, sources: &mut VersionTable) -> SsaVar {
    match var {
        SsaVar::User {
            name,
            version: None,
        } => {
            let version = match sources.get(&name) {
                Some(&version) => version,
                None => {
                    targets.entry(name.clone()).or_insert(0);
                    sources.insert(name.clone(), 0);
                    0
                }
            };
            SsaVar::versioned(name, version)
        }
        other => other,
    }
}

fn read_operand(
    operand: SsaOperand,
    targets: &mut VersionTable,
    sources: &mut VersionTable,
) -> SsaOperand {
    match operand {
        SsaOperand::Var(var) => SsaOperand::Var(read(var, targets, sources)),
        constant @ SsaOperand::Const(_) => constant,
    }
}

fn read_expr(expr: SsaExpr, targets: &mut VersionTable, sources: &mut VersionTable) -> SsaExpr {
    match expr {
        SsaExpr::Copy(operand) => SsaExpr::Copy(read_operand(operand, targets, sources)),
        SsaExpr::Unary { op, operand } => SsaExpr::Unary {
            op,
            operand: read_operand(operand, targets, sources),
        },
        SsaExpr::Binary { op, left, right } => {
            let left = read_operand(left, targets, sources);
            let right = read_operand(right, targets, sources);
            SsaExpr::Binary { op, left, right }
        }
    }
}

#[cfg(test)]
mod tests;
