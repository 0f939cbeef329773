use crate::{
    heap::{Heap, HeapData, HeapId},
    intern::{FunctionId, StringId},
    types::Type,
};

/// Primary value type representing runtime objects.
///
/// This enum uses a hybrid design: small immediate values (`Int`, `Bool`,
/// `None`, interned strings, function handles) are stored inline, while
/// classes and instances live in the arena and are referenced via
/// `Ref(HeapId)`.
///
/// `Value` is a cheap `Copy` handle, not the object itself: assigning,
/// returning, or capturing a `Ref` aliases the same allocation, and a
/// mutation through any alias is visible through all others. Derived
/// equality is therefore *identity* for heap values; value-level equality
/// goes through [`Runtime::evaluate_binary_operator`](crate::Runtime::evaluate_binary_operator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    /// An interned string. The StringId references the string in the
    /// runtime's intern table.
    InternString(StringId),
    /// A registered host function.
    Function(FunctionId),
    /// An ephemeral pairing of a function with a receiver instance.
    ///
    /// Produced by attribute resolution at lookup time, never stored by the
    /// engine. Calling it prepends the receiver to the explicit arguments.
    BoundMethod(FunctionId, HeapId),
    /// Reference to a heap-allocated class or instance.
    Ref(HeapId),
}

impl Value {
    /// Returns the type of this value.
    pub(crate) fn py_type(self, heap: &Heap) -> Type {
        match self {
            Self::None => Type::NoneType,
            Self::Bool(_) => Type::Bool,
            Self::Int(_) => Type::Int,
            Self::InternString(_) => Type::Str,
            Self::Function(_) => Type::Function,
            Self::BoundMethod(..) => Type::Method,
            Self::Ref(id) => match heap.get(id) {
                HeapData::ClassObject(_) => Type::Type,
                HeapData::Instance(_) => Type::Instance,
            },
        }
    }

    /// Returns the integer content, treating bools as 0/1.
    #[must_use]
    pub fn as_int(self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(i),
            Self::Bool(b) => Some(i64::from(b)),
            _ => None,
        }
    }

    /// Returns the boolean content, if this is a bool.
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}
