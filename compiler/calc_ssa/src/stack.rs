//! Native stack headroom for the recursive lowering and renaming walks.
//!
//! Expression and branch nesting is bounded only by the input, so every
//! level of those walks checks the remaining stack and continues on a fresh
//! segment when it runs low. WASM manages its own stack and calls straight
//! through.

/// Headroom below which a walk level switches to a new segment.
#[cfg(not(target_arch = "wasm32"))]
const HEADROOM: usize = 128 * 1024;

/// Size of each new segment.
#[cfg(not(target_arch = "wasm32"))]
const SEGMENT: usize = 2 * 1024 * 1024;

#[inline]
pub(crate) fn ensure_sufficient_stack<R>(walk: impl FnOnce() -> R) -> R {
    #[cfg(not(target_arch = "wasm32"))]
    {
        stacker::maybe_grow(HEADROOM, SEGMENT, walk)
    }
    #[cfg(target_arch = "wasm32")]
    {
        walk()
    }
}
