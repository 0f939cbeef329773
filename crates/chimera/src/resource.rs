//! Limits on hierarchy shape and call depth.
//!
//! The engine is a library embedded in a host evaluator, so runaway
//! hierarchies and unbounded host-callback recursion are failed with typed
//! errors instead of exhausting the stack.

/// Maximum depth of an inheritance chain (length of any base's linearization).
pub const MAX_INHERITANCE_DEPTH: usize = 1000;

/// Maximum length of a computed linearization.
pub const MAX_MRO_LENGTH: usize = 2600;

/// Default maximum nesting of `call` invocations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

/// Ceilings checked at class creation and call entry.
///
/// Injected at [`Runtime`](crate::Runtime) construction; there is no global
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceLimits {
    /// Rejects bases whose own linearization exceeds this length.
    pub max_inheritance_depth: usize,
    /// Rejects classes whose merged linearization exceeds this length.
    pub max_mro_length: usize,
    /// Rejects `call` invocations nested deeper than this.
    pub max_call_depth: usize,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            max_inheritance_depth: MAX_INHERITANCE_DEPTH,
            max_mro_length: MAX_MRO_LENGTH,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
