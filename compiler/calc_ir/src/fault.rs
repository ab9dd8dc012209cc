//! Fault taxonomy shared by the interpreter and the SSA builder.

use std::fmt;

/// Category of a fatal fault.
///
/// Each engine has its own error type with detailed kinds; every kind maps
/// to exactly one category so that callers can decide exit status without
/// matching engine-specific variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum FaultCategory {
    /// Unknown function, variable or array id.
    Lookup,
    /// Argument-count or array-size mismatch.
    Arity,
    /// Negative, out-of-bounds or oversized array index.
    Range,
    /// Near-zero divisor.
    Arithmetic,
    /// SSA builder met a construct it cannot lower.
    UnsupportedConstruct,
    /// Malformed program reached an engine.
    InternalConsistency,
    /// Allocation failure or configured depth limit exceeded.
    ResourceExhaustion,
}

impl FaultCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lookup => "lookup fault",
            Self::Arity => "arity fault",
            Self::Range => "range fault",
            Self::Arithmetic => "arithmetic fault",
            Self::UnsupportedConstruct => "unsupported construct",
            Self::InternalConsistency => "internal consistency fault",
            Self::ResourceExhaustion => "resource exhaustion",
        }
    }

    /// Whether the fault is a logic fault of the program (as opposed to an
    /// environment condition such as running out of memory).
    pub const fn is_logic_fault(self) -> bool {
        !matches!(self, Self::ResourceExhaustion)
    }
}

impl fmt::Display for FaultCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
