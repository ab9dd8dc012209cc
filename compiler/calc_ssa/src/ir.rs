//! SSA instruction types and their text rendering.
//!
//! Rendering is one instruction per line; branch arms are nested blocks
//! indented four spaces per level:
//!
//! ```text
//! %0 = a_0 > 0
//! if %0 {
//!     %1 = 1
//! } else {
//!     %2 = -1
//! }
//! result_1 = phi(%1, %2)
//! ```

use std::fmt;

use smallvec::SmallVec;

use calc_ir::{BinaryOp, UnaryOp};

/// An SSA name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SsaVar {
    /// Compiler temporary, assigned exactly once at construction.
    Temp(u32),
    /// A source variable. `version` is `None` until renaming.
    User { name: String, version: Option<u32> },
}

impl SsaVar {
    /// Unversioned user variable.
    pub fn user(name: impl Into<String>) -> Self {
        SsaVar::User {
            name: name.into(),
            version: None,
        }
    }

    pub fn versioned(name: impl Into<String>, version: u32) -> Self {
        SsaVar::User {
            name: name.into(),
            version: Some(version),
        }
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, SsaVar::Temp(_))
    }

    /// Source name, `None` for temporaries.
    pub fn name(&self) -> Option<&str> {
        match self {
            SsaVar::Temp(_) => None,
            SsaVar::User { name, .. } => Some(name),
        }
    }

    pub fn version(&self) -> Option<u32> {
        match self {
            SsaVar::Temp(_) => None,
            SsaVar::User { version, .. } => *version,
        }
    }
}

impl fmt::Display for SsaVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsaVar::Temp(n) => write!(f, "%{n}"),
            SsaVar::User {
                name,
                version: Some(v),
            } => write!(f, "{name}_{v}"),
            SsaVar::User {
                name,
                version: None,
            } => f.write_str(name),
        }
    }
}

/// Instruction operand.
#[derive(Clone, Debug, PartialEq)]
pub enum SsaOperand {
    Const(f64),
    Var(SsaVar),
}

impl fmt::Display for SsaOperand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsaOperand::Const(value) => write!(f, "{value}"),
            SsaOperand::Var(var) => write!(f, "{var}"),
        }
    }
}

/// Right-hand side of an assignment.
#[derive(Clone, Debug, PartialEq)]
pub enum SsaExpr {
    Copy(SsaOperand),
    Unary {
        op: UnaryOp,
        operand: SsaOperand,
    },
    Binary {
        op: BinaryOp,
        left: SsaOperand,
        right: SsaOperand,
    },
}

impl fmt::Display for SsaExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SsaExpr::Copy(operand) => write!(f, "{operand}"),
            SsaExpr::Unary { op, operand } => write!(f, "{}{operand}", op.as_symbol()),
            SsaExpr::Binary { op, left, right } => {
                write!(f, "{left} {} {right}", op.as_symbol())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SsaInst {
    /// `dest = value`
    Assign { dest: SsaVar, value: SsaExpr },
    /// Two-way branch; each arm owns its instructions.
    Branch {
        cond: SsaOperand,
        then_arm: SsaList,
        else_arm: SsaList,
    },
    /// `dest = phi(then, else)`
    Phi {
        dest: SsaVar,
        sources: SmallVec<[SsaVar; 2]>,
    },
}

/// An ordered instruction list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SsaList {
    insts: Vec<SsaInst>,
}

impl SsaList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, inst: SsaInst) {
        self.insts.push(inst);
    }

    pub fn insert(&mut self, index: usize, inst: SsaInst) {
        self.insts.insert(index, inst);
    }

    pub fn len(&self) -> usize {
        self.insts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    pub fn as_slice(&self) -> &[SsaInst] {
        &self.insts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SsaInst> {
        self.insts.iter()
    }

    /// Instructions at every nesting level, arms before the instructions
    /// that follow their branch.
    pub fn walk(&self) -> Vec<&SsaInst> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    /// Whether an instruction at or after `start`, at any depth, assigns the
    /// user variable `name`.
    pub fn writes_to_since(&self, start: usize, name: &str) -> bool {
        self.insts.get(start..).unwrap_or_default().iter().any(|inst| match inst {
            SsaInst::Assign { dest, .. } | SsaInst::Phi { dest, .. } => dest.name() == Some(name),
            SsaInst::Branch {
                then_arm, else_arm, ..
            } => then_arm.writes_to_since(0, name) || else_arm.writes_to_since(0, name),
        })
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a SsaInst>) {
        for inst in &self.insts {
            out.push(inst);
            if let SsaInst::Branch {
                then_arm, else_arm, ..
            } = inst
            {
                then_arm.collect_into(out);
                else_arm.collect_into(out);
            }
        }
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        for inst in &self.insts {
            indent(f, depth)?;
            match inst {
                SsaInst::Assign { dest, value } => writeln!(f, "{dest} = {value}")?,
                SsaInst::Phi { dest, sources } => {
                    write!(f, "{dest} = phi(")?;
                    for (i, source) in sources.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{source}")?;
                    }
                    writeln!(f, ")")?;
                }
                SsaInst::Branch {
                    cond,
                    then_arm,
                    else_arm,
                } => {
                    writeln!(f, "if {cond} {{")?;
                    then_arm.render(f, depth + 1)?;
                    indent(f, depth)?;
                    writeln!(f, "}} else {{")?;
                    else_arm.render(f, depth + 1)?;
                    indent(f, depth)?;
                    writeln!(f, "}}")?;
                }
            }
        }
        Ok(())
    }
}

fn indent(f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    for _ in 0..depth {
        f.write_str("    ")?;
    }
    Ok(())
}

impl fmt::Display for SsaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0)
    }
}

impl From<Vec<SsaInst>> for SsaList {
    fn from(insts: Vec<SsaInst>) -> Self {
        SsaList { insts }
    }
}

impl IntoIterator for SsaList {
    type Item = SsaInst;
    type IntoIter = std::vec::IntoIter<SsaInst>;

    fn into_iter(self) -> Self::IntoIter {
        self.insts.into_iter()
    }
}

impl<'a> IntoIterator for &'a SsaList {
    type Item = &'a SsaInst;
    type IntoIter = std::slice::Iter<'a, SsaInst>;

    fn into_iter(self) -> Self::IntoIter {
        self.insts.iter()
    }
}
