//! Expression arena.
//!
//! All nodes of a program live in one contiguous `Vec`; call argument lists
//! live in a second one addressed by [`ExprRange`].

use crate::{ExprId, ExprKind, ExprRange};

/// Append-only storage for expression nodes.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprArena {
    exprs: Vec<ExprKind>,
    expr_lists: Vec<ExprId>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and return its id.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "expression counts never exceed u32"
    )]
    pub fn alloc(&mut self, kind: ExprKind) -> ExprId {
        let id = ExprId::new(self.exprs.len() as u32);
        self.exprs.push(kind);
        id
    }

    /// Store a list of ids contiguously and return its range.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "expression counts never exceed u32"
    )]
    pub fn alloc_list(&mut self, ids: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = self.expr_lists.len() as u32;
        self.expr_lists.extend(ids);
        let len = self.expr_lists.len() as u32 - start;
        ExprRange::new(start, len)
    }

    /// Look up a node. `None` for an id from another arena.
    #[inline]
    pub fn get(&self, id: ExprId) -> Option<&ExprKind> {
        self.exprs.get(id.index())
    }

    /// Look up a list. `None` if the range falls outside the list storage.
    pub fn list(&self, range: ExprRange) -> Option<&[ExprId]> {
        let start = range.start as usize;
        self.expr_lists.get(start..start + range.len())
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }
}
