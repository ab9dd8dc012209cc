//! Interned function names.
//!
//! Call nodes store a `Name(u32)` so `ExprKind` stays `Copy`; the
//! [`NameTable`] owned by the [`Program`](crate::Program) maps it back to text.

use rustc_hash::FxHashMap;

/// Interned identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Append-only string interner.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NameTable {
    strings: Vec<String>,
    #[cfg_attr(feature = "serde", serde(skip))]
    lookup: FxHashMap<String, Name>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `text`, returning the existing `Name` if already present.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "name counts never exceed u32"
    )]
    pub fn intern(&mut self, text: &str) -> Name {
        if let Some(&name) = self.lookup.get(text) {
            return name;
        }
        let name = Name(self.strings.len() as u32);
        self.strings.push(text.to_owned());
        self.lookup.insert(text.to_owned(), name);
        name
    }

    /// Resolve a `Name` back to its text.
    ///
    /// Returns `None` for a name that did not come from this table.
    pub fn lookup(&self, name: Name) -> Option<&str> {
        self.strings.get(name.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
