//! String interning for attribute and method names.
//!
//! Attribute names are interned once and addressed by [`StringId`] so that
//! namespace lookups compare 4-byte ids instead of hashing strings. The
//! interner is pre-seeded with the static protocol names ([`StaticStrings`]),
//! which therefore have known ids and never need a map lookup to produce.
//!
//! The interner also owns the function table: host-registered functions are
//! addressed by [`FunctionId`] the same way interned names are addressed by
//! `StringId`.

use ahash::AHashMap;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};

use crate::function::Function;

/// Index into the string interner's storage.
///
/// Uses `u32` to save space. Equal ids always denote equal strings, and
/// equal strings always intern to equal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringId(u32);

impl StringId {
    /// Returns the raw index value.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Unique identifier for a registered function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionId(u32);

impl FunctionId {
    /// Returns the raw index value.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Static protocol names which are known at compile time.
///
/// Seeded into the interner at construction in declaration order, so the
/// discriminant doubles as the `StringId` index.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub(crate) enum StaticStrings {
    #[strum(serialize = "__init__")]
    DunderInit,
    #[strum(serialize = "__add__")]
    DunderAdd,
    #[strum(serialize = "__eq__")]
    DunderEq,
    #[strum(serialize = "__lt__")]
    DunderLt,
}

impl From<StaticStrings> for StringId {
    fn from(s: StaticStrings) -> Self {
        Self(s as u32)
    }
}

/// String interner and function table.
///
/// Lookups by id are infallible; lookups by string return `None` for names
/// that were never interned (which for attribute resolution means the name
/// cannot exist in any namespace).
#[derive(Debug)]
pub(crate) struct Interns {
    map: AHashMap<String, StringId>,
    strings: Vec<String>,
    functions: Vec<Function>,
}

impl Interns {
    pub fn new() -> Self {
        let mut interns = Self {
            map: AHashMap::new(),
            strings: Vec::new(),
            functions: Vec::new(),
        };
        for s in StaticStrings::iter() {
            let name: &'static str = s.into();
            let id = interns.intern(name);
            debug_assert_eq!(id, StringId::from(s));
        }
        interns
    }

    /// Interns a string, returning its id (existing or newly assigned).
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.map.get(s) {
            return id;
        }
        let id = StringId(u32::try_from(self.strings.len()).expect("interner out of u32 range"));
        self.strings.push(s.to_string());
        self.map.insert(s.to_string(), id);
        id
    }

    /// Looks up the id of an already-interned string without interning.
    pub fn lookup(&self, s: &str) -> Option<StringId> {
        self.map.get(s).copied()
    }

    /// Returns the string for an id.
    ///
    /// # Panics
    /// Panics if the id did not originate from this interner.
    pub fn get_str(&self, id: StringId) -> &str {
        self.strings.get(id.index()).expect("invalid string id")
    }

    /// Registers a function and returns its id.
    pub fn add_function(&mut self, function: Function) -> FunctionId {
        let id = FunctionId(u32::try_from(self.functions.len()).expect("function table out of u32 range"));
        self.functions.push(function);
        id
    }

    /// Looks up a function by its id.
    ///
    /// # Panics
    /// Panics if the id did not originate from this interner.
    pub fn get_function(&self, id: FunctionId) -> &Function {
        self.functions.get(id.index()).expect("invalid function id")
    }
}

impl Default for Interns {
    fn default() -> Self {
        Self::new()
    }
}
