//! Symbol table: variable id → declared name and length.

use std::fmt;

/// Parse-time variable identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        VarId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VarId({})", self.0)
    }
}

/// A declared variable.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Symbol {
    pub name: String,
    /// Declared length; 1 means scalar.
    pub len: u32,
}

impl Symbol {
    #[inline]
    pub fn is_array(&self) -> bool {
        self.len > 1
    }
}

/// Dense table indexed by [`VarId`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new variable and return its id.
    ///
    /// A length of 0 is treated as 1 (every variable holds at least one value).
    #[expect(
        clippy::cast_possible_truncation,
        reason = "symbol counts never exceed u32"
    )]
    pub fn declare(&mut self, name: impl Into<String>, len: u32) -> VarId {
        let id = VarId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name: name.into(),
            len: len.max(1),
        });
        id
    }

    pub fn get(&self, id: VarId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    /// Declared name, or `None` for an unknown id.
    pub fn name(&self, id: VarId) -> Option<&str> {
        self.get(id).map(|s| s.name.as_str())
    }

    /// Iterate over `(id, symbol)` pairs in declaration order.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "symbol counts never exceed u32"
    )]
    pub fn iter(&self) -> impl Iterator<Item = (VarId, &Symbol)> + '_ {
        self.symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (VarId(i as u32), s))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
