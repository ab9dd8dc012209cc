//! Expression IDs and ranges for the flat AST.
//!
//! - `ExprId(u32)` instead of `Box<Expr>`: copyable, cheap to push on the
//!   interpreter's continuation stack
//! - `ExprRange` for call argument lists stored contiguously in the arena

use std::fmt;

/// Index into an [`ExprArena`](crate::ExprArena).
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    /// Create a new `ExprId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A contiguous run of expression ids in the arena's list storage.
///
/// Used for call arguments so that `ExprKind` stays `Copy`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExprRange {
    pub start: u32,
    pub len: u32,
}

impl ExprRange {
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        ExprRange { start, len }
    }

    #[inline]
    pub const fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len == 0
    }
}
