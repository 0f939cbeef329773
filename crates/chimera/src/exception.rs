use std::fmt;

use strum::{Display, EnumString, IntoStaticStr};

use crate::binary::BinaryOp;

/// Result type alias for operations that can produce a runtime error.
pub type RunResult<T> = Result<T, RunError>;

/// Error classes raised by the engine.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and
/// `Into<&'static str>` implementations. The string representation matches
/// the variant name exactly (e.g., `TypeError` -> "TypeError").
///
/// All failures are synchronous, deterministic computations over in-memory
/// state; none is transient, so there is no retry dimension to any variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr)]
pub enum ExcType {
    /// Attribute lookup miss; recoverable by the embedding evaluator.
    AttributeLookupError,
    /// No ordering of a class's ancestors satisfies the merge rules.
    /// Raised at class-creation time; no class is produced.
    LinearizationConflict,
    /// Native integer arithmetic overflowed.
    OverflowError,
    /// The call-depth ceiling was exceeded.
    RecursionError,
    /// Wrong handle kind, arity mismatch, non-class base, or a hierarchy
    /// guard violation.
    TypeError,
    /// Binary operator dispatch found no supporting method.
    UnsupportedOperationError,
}

impl ExcType {
    /// Creates an attribute lookup error: `{owner} has no attribute '{attr}'`.
    ///
    /// `owner` is the pre-formatted owner description, e.g. `'Point' object`
    /// or `type object 'Point'`.
    pub(crate) fn attribute_error(owner: impl fmt::Display, attr: &str) -> RunError {
        RunError::new(Self::AttributeLookupError, format!("{owner} has no attribute '{attr}'"))
    }

    /// Creates a linearization conflict error naming the offending bases.
    pub(crate) fn linearization_conflict(base_names: &str) -> RunError {
        RunError::new(
            Self::LinearizationConflict,
            format!("cannot create a consistent method resolution order for bases {base_names}"),
        )
    }

    /// Creates a generic type error with the given message.
    pub(crate) fn type_error(message: impl Into<String>) -> RunError {
        RunError::new(Self::TypeError, message.into())
    }

    /// Creates an arity error for a callable that takes no arguments.
    pub(crate) fn type_error_no_args(name: &str, given: usize) -> RunError {
        RunError::new(Self::TypeError, format!("{name}() takes no arguments ({given} given)"))
    }

    /// Creates an arity error for a callable with a fixed parameter count.
    pub(crate) fn type_error_arg_count(name: &str, expected: usize, given: usize) -> RunError {
        RunError::new(
            Self::TypeError,
            format!("{name}() takes {expected} positional arguments but {given} were given"),
        )
    }

    /// Creates an unsupported-operand error for a binary operator miss.
    pub(crate) fn unsupported_operand(op: BinaryOp, left_type: &str, right_type: &str) -> RunError {
        RunError::new(
            Self::UnsupportedOperationError,
            format!("unsupported operand type(s) for {op}: '{left_type}' and '{right_type}'"),
        )
    }

    /// Creates an overflow error for native integer arithmetic.
    pub(crate) fn overflow_error(op: BinaryOp) -> RunError {
        RunError::new(Self::OverflowError, format!("integer result of '{op}' out of range"))
    }

    /// Creates a recursion error for the call-depth ceiling.
    pub(crate) fn recursion_error(limit: usize) -> RunError {
        RunError::new(
            Self::RecursionError,
            format!("maximum call depth exceeded (limit {limit})"),
        )
    }
}

/// A raised engine error: an [`ExcType`] plus a human-readable message.
///
/// Mutations never partially apply: an operation that returns a `RunError`
/// has left every namespace exactly as it found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunError {
    exc_type: ExcType,
    message: String,
}

impl RunError {
    pub(crate) fn new(exc_type: ExcType, message: String) -> Self {
        Self { exc_type, message }
    }

    /// Returns the error class.
    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    /// Returns the error message (without the leading error-class name).
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.exc_type, self.message)
    }
}

impl std::error::Error for RunError {}
