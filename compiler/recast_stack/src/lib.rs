//! Stack safety for deep recursion.
//!
//! Tree walks in this workspace recurse once per nesting level. Machine
//! generated sources nest conditions and blocks thousands deep, so every
//! recursive walk goes through [`ensure_sufficient_stack`], which grows the
//! stack on demand.
//!
//! - **Native targets**: `stacker::maybe_grow` with a 100KB red zone and
//!   1MB growth steps.
//! - **WASM targets**: plain call.

/// Minimum stack space to keep available before recursing.
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing.
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version - just call directly (WASM has its own stack management).
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
