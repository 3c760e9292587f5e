//! Stack growth for recursion over deep trees.
//!
//! Parsing the nested wire form and walking the tree recurse once per tree
//! level. Trees are only bounded by the walker's `max_depth`, which the
//! caller can raise, so each recursive step runs through [`with_stack`].

const RED_ZONE: usize = 128 * 1024; // 128KB
const STACK_PER_CALL: usize = 2 * 1024 * 1024; // 2MB

/// Run `f`, switching to a fresh stack segment first when fewer than
/// `RED_ZONE` bytes remain on the current one.
pub fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_CALL, f)
}
