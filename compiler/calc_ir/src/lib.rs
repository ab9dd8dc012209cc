//! Calc IR - shared program representation for the calc language.
//!
//! This crate contains the data every engine works from:
//! - Expression arena with `ExprId(u32)` indices (no `Box<Expr>`)
//! - Operators for unary, binary and increment/decrement nodes
//! - Symbol table mapping `VarId` to declared name and length
//! - Function registry (name → parameters + body)
//! - `Program`, the immutable bundle handed to the interpreter and SSA builder
//! - `ProgramBuilder` for constructing programs without a parser
//!
//! # Design Philosophy
//!
//! - **Flatten Everything**: children are `ExprId` indices into one arena
//! - **Closed variants**: every node category is an enum matched exhaustively;
//!   engines never recover operator-specific fields by downcasting
//! - **Build once**: a `Program` is immutable after construction

pub mod ast;
mod arena;
mod expr_id;
mod fault;
mod function;
mod name;
mod numeric;
mod program;
mod symbols;

pub use arena::ExprArena;
pub use ast::{BinaryOp, ExprKind, IncDecOp, Place, UnaryOp};
pub use expr_id::{ExprId, ExprRange};
pub use fault::FaultCategory;
pub use function::{FunctionDef, FunctionRegistry, Param};
pub use name::{Name, NameTable};
pub use numeric::{eps_eq, is_zero, truth};
pub use program::{Program, ProgramBuilder};
pub use symbols::{Symbol, SymbolTable, VarId};

/// Name of the variable whose value a function returns.
pub const RESULT_VAR: &str = "result";

/// Name of the default entry function.
pub const ENTRY_FUNCTION: &str = "main";
