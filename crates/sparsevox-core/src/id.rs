//! Strongly-typed identifiers for attributes, slots, and schema generations.

use std::fmt;
use std::num::TryFromIntError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies an attribute within a schema.
///
/// `AttributeId(n)` is the n-th descriptor of the schema and also the index
/// of the attribute's buffer in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub u32);

impl AttributeId {
    /// The attribute index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AttributeId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

impl TryFrom<usize> for AttributeId {
    type Error = TryFromIntError;

    fn try_from(v: usize) -> Result<Self, Self::Error> {
        u32::try_from(v).map(Self)
    }
}

/// Index of a chunk slot within the attribute buffers.
///
/// Every attribute buffer holds the slot at the same index, so one
/// `SlotIndex` addresses a chunk across all attributes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// Sentinel marking an unallocated chunk-grid cell.
    pub const EMPTY: Self = Self(u32::MAX);

    /// Whether this is the [`SlotIndex::EMPTY`] sentinel.
    pub fn is_empty(self) -> bool {
        self == Self::EMPTY
    }

    /// The slot index as a `usize`.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "EMPTY")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<u32> for SlotIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`SchemaGeneration`] allocation.
static SCHEMA_GENERATION_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-schema token.
///
/// Allocated from a monotonic atomic counter when an [`AttributeSchema`]
/// is built. Storage records the generation of the schema its buffers were
/// laid out for; a different generation means the buffers were rebuilt.
///
/// Cloning a schema preserves its generation, which is correct because a
/// schema is immutable once built.
///
/// [`AttributeSchema`]: crate::AttributeSchema
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaGeneration(u64);

impl SchemaGeneration {
    /// Never allocated; stands in for "no schema seen yet" in consumers
    /// that cache a generation.
    pub const NONE: Self = Self(0);

    /// Allocate a fresh, unique generation.
    ///
    /// Each call returns a value never returned before within this
    /// process. Thread-safe.
    pub fn next() -> Self {
        Self(SCHEMA_GENERATION_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SchemaGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
