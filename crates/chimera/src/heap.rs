use std::collections::BTreeMap;

use crate::types::{ClassObject, Instance};

/// Index into the heap's object storage.
///
/// Uses `u32` to save space (4 bytes vs 8 bytes for `usize`). Handles are
/// only meaningful for the `Runtime` that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeapId(u32);

impl HeapId {
    /// Creates a HeapId from a raw index value.
    ///
    /// # Panics
    /// Panics if the index exceeds `u32::MAX` (an unreachable heap size).
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("heap index out of u32 range"))
    }

    /// Returns the raw index value.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A heap-allocated runtime object.
///
/// Only classes and instances live on the heap; everything else is an
/// immediate [`Value`](crate::Value) variant.
#[derive(Debug)]
pub(crate) enum HeapData {
    ClassObject(ClassObject),
    Instance(Instance),
}

impl HeapData {
    /// Returns the static variant name, used for heap statistics.
    pub fn variant_name(&self) -> &'static str {
        match self {
            Self::ClassObject(_) => "ClassObject",
            Self::Instance(_) => "Instance",
        }
    }
}

/// Arena of runtime objects addressed by [`HeapId`].
///
/// The arena is append-only: liveness is host-managed (any reachable object
/// stays alive), so slots are never freed or reused for the life of the
/// runtime and a `HeapId` can never dangle.
#[derive(Debug, Default)]
pub(crate) struct Heap {
    slots: Vec<HeapData>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id the next allocation will receive.
    ///
    /// Used to compute a class's linearization (which names the class
    /// itself) before the class object is stored.
    pub fn next_id(&self) -> HeapId {
        HeapId::new(self.slots.len())
    }

    /// Stores an object and returns its id.
    pub fn allocate(&mut self, data: HeapData) -> HeapId {
        let id = self.next_id();
        self.slots.push(data);
        id
    }

    /// Returns a reference to the object at `id`.
    ///
    /// # Panics
    /// Panics if `id` did not originate from this heap.
    pub fn get(&self, id: HeapId) -> &HeapData {
        self.slots.get(id.index()).expect("invalid heap id")
    }

    /// Returns a mutable reference to the object at `id`.
    ///
    /// # Panics
    /// Panics if `id` did not originate from this heap.
    pub fn get_mut(&mut self, id: HeapId) -> &mut HeapData {
        self.slots.get_mut(id.index()).expect("invalid heap id")
    }

    /// Returns the number of objects on the heap.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Captures an object-count snapshot of the heap.
    pub fn stats(&self) -> HeapStats {
        let mut objects_by_type = BTreeMap::new();
        for slot in &self.slots {
            *objects_by_type.entry(slot.variant_name()).or_insert(0) += 1;
        }
        HeapStats {
            live_objects: self.slots.len(),
            objects_by_type,
        }
    }
}

/// Snapshot of heap state at a point in time.
///
/// The `objects_by_type` map uses `BTreeMap` for deterministic iteration
/// order, making snapshots suitable for display and comparison without sort
/// overhead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeapStats {
    /// Total number of objects on the heap.
    pub live_objects: usize,
    /// Breakdown of objects by variant name (e.g., "ClassObject", "Instance").
    pub objects_by_type: BTreeMap<&'static str, usize>,
}
