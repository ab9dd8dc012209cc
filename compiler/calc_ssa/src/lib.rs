//! Calc SSA - single-static-assignment construction for calc functions.
//!
//! [`SsaBuilder::build`] runs in two phases:
//!
//! 1. **Lowering** (`lower`): the body is flattened to three-address form.
//!    Every intermediate value gets a fresh temporary `%N`; `if` and ternary
//!    become [`SsaInst::Branch`] with nested arms, and a ternary's value is
//!    merged by a [`SsaInst::Phi`] over the two arm temporaries.
//! 2. **Renaming** (`rename`): user variables get versions. Reads see the
//!    current version, writes allocate the next one, and after each branch a
//!    phi is inserted for every variable whose version differs between the
//!    arms.
//!
//! Loops, calls and arrays are not handled; they fail with
//! [`SsaErrorKind::UnsupportedConstruct`].

mod errors;
mod ir;
mod lower;
mod rename;
mod stack;

pub use errors::{SsaError, SsaErrorKind, SsaResult};
pub use ir::{SsaExpr, SsaInst, SsaList, SsaOperand, SsaVar};
pub use lower::SsaBuilder;
pub use rename::rename;

use calc_ir::Program;

/// Build SSA for the function `name` of `program` with a fresh builder.
pub fn build_ssa(program: &Program, name: &str) -> SsaResult<SsaList> {
    SsaBuilder::new(program).build_function(name)
}
