//! The immutable program bundle and its builder.
//!
//! A front end (parser, test, embedding host) produces a [`Program`]: the
//! expression arena, the function-name table, the symbol table and the
//! function registry. Engines only ever borrow it.

use rustc_hash::FxHashMap;

use crate::{
    BinaryOp, ExprArena, ExprId, ExprKind, FunctionDef, FunctionRegistry, IncDecOp, Name,
    NameTable, Param, Place, SymbolTable, UnaryOp, VarId,
};

/// Everything an engine needs to run or lower a program.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    pub arena: ExprArena,
    pub names: NameTable,
    pub symbols: SymbolTable,
    pub functions: FunctionRegistry,
}

impl Program {
    #[inline]
    pub fn expr(&self, id: ExprId) -> Option<&ExprKind> {
        self.arena.get(id)
    }

    #[inline]
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.lookup(name)
    }
}

/// Builds a [`Program`] node by node.
///
/// Variables are declared by `(name, length)`: asking twice for the same
/// pair yields the same [`VarId`], so every function can say `result`
/// without coordinating ids.
#[derive(Default)]
pub struct ProgramBuilder {
    program: Program,
    vars: FxHashMap<(String, u32), VarId>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // Declarations

    /// Declare (or reuse) a scalar variable.
    pub fn scalar(&mut self, name: &str) -> VarId {
        self.declare(name, 1)
    }

    /// Declare (or reuse) an array variable of `len` elements.
    pub fn array(&mut self, name: &str, len: u32) -> VarId {
        self.declare(name, len)
    }

    fn declare(&mut self, name: &str, len: u32) -> VarId {
        let len = len.max(1);
        let symbols = &mut self.program.symbols;
        *self
            .vars
            .entry((name.to_owned(), len))
            .or_insert_with(|| symbols.declare(name, len))
    }

    /// Register a function. Returns the definition it replaced, if any.
    pub fn function(&mut self, name: &str, params: Vec<Param>, body: ExprId) -> Option<FunctionDef> {
        self.program.functions.register(FunctionDef {
            name: name.to_owned(),
            params,
            body,
        })
    }

    /// Intern a function name.
    pub fn name(&mut self, text: &str) -> Name {
        self.program.names.intern(text)
    }

    // Leaves

    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        self.program.arena.alloc(kind)
    }

    pub fn num(&mut self, value: f64) -> ExprId {
        self.alloc(ExprKind::Number(value))
    }

    /// Read of the scalar `name`, declaring it if needed.
    pub fn var(&mut self, name: &str) -> ExprId {
        let id = self.scalar(name);
        self.alloc(ExprKind::Variable(id))
    }

    /// Bare reference to an already declared variable.
    ///
    /// Passing an array to a function takes this form.
    pub fn var_ref(&mut self, var: VarId) -> ExprId {
        self.alloc(ExprKind::Variable(var))
    }

    pub fn empty(&mut self) -> ExprId {
        self.alloc(ExprKind::Empty)
    }

    // Operators

    pub fn unary(&mut self, op: UnaryOp, operand: ExprId) -> ExprId {
        self.alloc(ExprKind::Unary { op, operand })
    }

    pub fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.alloc(ExprKind::Binary { op, left, right })
    }

    pub fn ternary(&mut self, cond: ExprId, then_expr: ExprId, else_expr: ExprId) -> ExprId {
        self.alloc(ExprKind::Ternary {
            cond,
            then_expr,
            else_expr,
        })
    }

    // Stores

    /// `name = value` on a scalar.
    pub fn assign(&mut self, name: &str, value: ExprId) -> ExprId {
        let id = self.scalar(name);
        self.alloc(ExprKind::Assign {
            target: Place::Scalar(id),
            value,
        })
    }

    /// `array[index] = value`.
    pub fn assign_element(&mut self, array: VarId, index: ExprId, value: ExprId) -> ExprId {
        self.alloc(ExprKind::Assign {
            target: Place::Element { array, index },
            value,
        })
    }

    /// `array[index]` read.
    pub fn index(&mut self, array: VarId, index: ExprId) -> ExprId {
        self.alloc(ExprKind::Index { array, index })
    }

    pub fn inc_dec(&mut self, op: IncDecOp, target: Place) -> ExprId {
        self.alloc(ExprKind::IncDec { op, target })
    }

    // Statements

    pub fn seq(&mut self, first: ExprId, second: ExprId) -> ExprId {
        self.alloc(ExprKind::Seq { first, second })
    }

    /// Chain statements left to right into nested `Seq` nodes.
    ///
    /// An empty block is a single `Empty` node.
    pub fn block(&mut self, stmts: impl IntoIterator<Item = ExprId>) -> ExprId {
        let mut stmts = stmts.into_iter();
        let Some(first) = stmts.next() else {
            return self.empty();
        };
        stmts.fold(first, |acc, next| self.seq(acc, next))
    }

    pub fn while_loop(&mut self, cond: ExprId, body: ExprId) -> ExprId {
        self.alloc(ExprKind::While { cond, body })
    }

    pub fn if_else(&mut self, cond: ExprId, then_branch: ExprId, else_branch: ExprId) -> ExprId {
        self.alloc(ExprKind::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `if` without `else`.
    pub fn if_then(&mut self, cond: ExprId, then_branch: ExprId) -> ExprId {
        let else_branch = self.empty();
        self.if_else(cond, then_branch, else_branch)
    }

    pub fn call(&mut self, callee: &str, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let callee = self.name(callee);
        let args = self.program.arena.alloc_list(args);
        self.alloc(ExprKind::Call { callee, args })
    }

    /// Finish building.
    pub fn finish(self) -> Program {
        self.program
    }
}
