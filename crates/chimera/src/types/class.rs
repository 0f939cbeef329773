//! Class objects and instances.
//!
//! `ClassObject` represents the class itself; `Instance` represents objects
//! created from it.
//!
//! # Attribute Access
//!
//! - Instance attributes are checked first, then class attributes through
//!   the cached linearization, freshly on every lookup
//! - Class attributes are shared across all instances, existing and future
//! - Setting an attribute on an instance creates an instance-level entry and
//!   never touches the class

use crate::{
    exception::{ExcType, RunResult},
    heap::{Heap, HeapData, HeapId},
    intern::{Interns, StringId},
    namespace::Namespace,
    resource::ResourceLimits,
    value::Value,
};

/// A class object, created by `create_class`.
///
/// Contains the class name, base classes, and a namespace holding class
/// attributes and method definitions. Methods are stored as
/// `Value::Function` entries and bound to a receiver only at lookup time.
///
/// Bases are immutable after creation, so the linearization is computed
/// once (eagerly, before the class is stored) and never recomputed.
#[derive(Debug)]
pub(crate) struct ClassObject {
    /// The interned class name (e.g., "Foo", "MyClass").
    name: StringId,
    /// Class namespace containing class attributes and method definitions.
    namespace: Namespace,
    /// Direct base classes, in declared order. Empty for classes with no
    /// bases; there is no implicit root class.
    bases: Vec<HeapId>,
    /// Method resolution order computed by C3 linearization.
    /// Includes this class itself as the first entry.
    mro: Vec<HeapId>,
}

impl ClassObject {
    /// Creates a new class object with base classes and a precomputed MRO.
    ///
    /// # Arguments
    /// * `name` - The interned class name
    /// * `namespace` - Seeded class attributes and methods
    /// * `bases` - Direct base class HeapIds, in declared order
    /// * `mro` - Full MRO (computed by [`compute_c3_mro`]), including self
    ///   as the first element
    #[must_use]
    pub fn new(name: StringId, namespace: Namespace, bases: Vec<HeapId>, mro: Vec<HeapId>) -> Self {
        Self {
            name,
            namespace,
            bases,
            mro,
        }
    }

    /// Returns the class name.
    #[must_use]
    pub fn name<'a>(&self, interns: &'a Interns) -> &'a str {
        interns.get_str(self.name)
    }

    /// Returns a reference to the class namespace.
    #[must_use]
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Returns a mutable reference to the class namespace.
    ///
    /// Writes through this reference are visible to every instance of this
    /// class (and of any class whose linearization reaches it) on the very
    /// next lookup, because resolution is never cached.
    pub fn namespace_mut(&mut self) -> &mut Namespace {
        &mut self.namespace
    }

    /// Returns the direct base class HeapIds.
    #[must_use]
    pub fn bases(&self) -> &[HeapId] {
        &self.bases
    }

    /// Returns the method resolution order as a slice of HeapIds.
    /// The first element is always this class itself.
    #[must_use]
    pub fn mro(&self) -> &[HeapId] {
        &self.mro
    }

    /// Looks up an attribute by walking the MRO (this class first, then
    /// bases in MRO order). Returns the first definition found.
    pub fn mro_lookup_attr(&self, attr: StringId, heap: &Heap) -> Option<Value> {
        // Check own namespace first
        if let Some(value) = self.namespace.get(attr) {
            return Some(*value);
        }
        // Walk the MRO (skip self which is mro[0])
        for &base_id in self.mro.iter().skip(1) {
            if let HeapData::ClassObject(base_cls) = heap.get(base_id)
                && let Some(value) = base_cls.namespace.get(attr)
            {
                return Some(*value);
            }
        }
        None
    }

    /// Checks if this class (identified by `self_id`) is a subclass of
    /// `other_id`. A class is considered a subclass of itself.
    pub fn is_subclass_of(&self, self_id: HeapId, other_id: HeapId) -> bool {
        if self_id == other_id {
            return true;
        }
        self.mro.contains(&other_id)
    }
}

/// An instance, created from a [`ClassObject`].
///
/// Contains a reference to the owning class and a private attribute
/// namespace, initially empty and populated only by explicit assignment.
/// The namespace is never shared with any other instance, including other
/// instances of the same class.
#[derive(Debug)]
pub(crate) struct Instance {
    /// HeapId of the ClassObject this instance belongs to.
    class_id: HeapId,
    /// Instance attributes. Entries that exist only in the class chain are
    /// visible through resolution, not through this namespace.
    attrs: Namespace,
}

impl Instance {
    /// Creates a new instance of the given class with an empty namespace.
    #[must_use]
    pub fn new(class_id: HeapId) -> Self {
        Self {
            class_id,
            attrs: Namespace::new(),
        }
    }

    /// Returns the HeapId of the class this instance belongs to.
    #[must_use]
    pub fn class_id(&self) -> HeapId {
        self.class_id
    }

    /// Returns a reference to the instance attribute namespace.
    #[must_use]
    pub fn attrs(&self) -> &Namespace {
        &self.attrs
    }

    /// Returns a mutable reference to the instance attribute namespace.
    pub fn attrs_mut(&mut self) -> &mut Namespace {
        &mut self.attrs
    }
}

// ============================================================================
// C3 Linearization
// ============================================================================

/// Computes the C3 linearization (MRO) for a class with the given bases.
///
/// The C3 algorithm merges the MROs of all base classes with the list of
/// bases itself to produce a consistent method resolution order: the class
/// first, every ancestor exactly once, each base's internal order preserved,
/// and the declared left-to-right base precedence preserved.
///
/// # Arguments
/// * `self_id` - HeapId the class being defined will receive
/// * `bases` - Direct base class HeapIds
/// * `heap` - Heap to look up base class MROs
///
/// # Returns
/// The full MRO starting with `self_id`, or a `LinearizationConflict` if the
/// hierarchy is inconsistent (would produce an ambiguous ordering).
pub(crate) fn compute_c3_mro(
    self_id: HeapId,
    bases: &[HeapId],
    heap: &Heap,
    interns: &Interns,
    limits: &ResourceLimits,
) -> RunResult<Vec<HeapId>> {
    if bases.is_empty() {
        return Ok(vec![self_id]);
    }

    // A class cannot appear among its own bases; ids are assigned at
    // creation, so this only trips on a stale handle.
    if bases.contains(&self_id) {
        return Err(ExcType::type_error("a class cannot inherit from itself"));
    }

    // Collect the MROs of all base classes
    let mut linearizations: Vec<Vec<HeapId>> = Vec::with_capacity(bases.len() + 1);
    for &base_id in bases {
        match heap.get(base_id) {
            HeapData::ClassObject(cls) => linearizations.push(cls.mro().to_vec()),
            HeapData::Instance(_) => return Err(ExcType::type_error("bases must be classes")),
        }
    }
    // Reject chains deeper than the configured ceiling
    for lin in &linearizations {
        if lin.len() > limits.max_inheritance_depth {
            return Err(ExcType::type_error(format!(
                "inheritance chain too deep (maximum depth {})",
                limits.max_inheritance_depth
            )));
        }
    }

    // Add the list of bases itself as the last sequence to merge
    linearizations.push(bases.to_vec());

    // C3 merge
    let mut result = vec![self_id];
    loop {
        // Remove empty lists
        linearizations.retain(|l| !l.is_empty());
        if linearizations.is_empty() {
            break;
        }

        // Find a good head: a class that does not appear in the tail of any list
        let mut found = None;
        for lin in &linearizations {
            let candidate = lin[0];
            let in_tail = linearizations.iter().any(|other| other[1..].contains(&candidate));
            if !in_tail {
                found = Some(candidate);
                break;
            }
        }

        if let Some(next) = found {
            result.push(next);
            // Remove `next` from the head of all lists where it appears
            for lin in &mut linearizations {
                if !lin.is_empty() && lin[0] == next {
                    lin.remove(0);
                }
            }
        } else {
            // Build the error message from the declared base names
            let base_names: Vec<&str> = bases
                .iter()
                .map(|&id| match heap.get(id) {
                    HeapData::ClassObject(cls) => cls.name(interns),
                    HeapData::Instance(_) => "?",
                })
                .collect();
            return Err(ExcType::linearization_conflict(&base_names.join(", ")));
        }

        if result.len() > limits.max_mro_length {
            return Err(ExcType::type_error(format!(
                "method resolution order exceeds maximum length {}",
                limits.max_mro_length
            )));
        }
    }

    Ok(result)
}
