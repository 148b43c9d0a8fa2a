//! The attribute schema: an ordered, immutable list of descriptors.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::attribute::AttributeDescriptor;
use crate::error::SchemaError;
use crate::id::{AttributeId, SchemaGeneration};

/// Ordered attribute descriptors shared by reference with storage.
///
/// Order defines buffer correspondence: descriptor `n` describes the data
/// in storage buffer `n`. A schema never changes after it is built;
/// replacing a storage's schema means handing it a new one, which carries
/// a new [`SchemaGeneration`].
#[derive(Clone, Debug)]
pub struct AttributeSchema {
    descriptors: Vec<AttributeDescriptor>,
    by_name: IndexMap<String, AttributeId>,
    generation: SchemaGeneration,
}

impl AttributeSchema {
    /// Build a schema from descriptors in buffer order.
    pub fn new(descriptors: Vec<AttributeDescriptor>) -> Result<Self, SchemaError> {
        if u32::try_from(descriptors.len()).is_err() {
            return Err(SchemaError::TooManyAttributes {
                count: descriptors.len(),
            });
        }
        let mut by_name = IndexMap::with_capacity(descriptors.len());
        for (i, d) in descriptors.iter().enumerate() {
            if by_name
                .insert(d.name().to_string(), AttributeId(i as u32))
                .is_some()
            {
                return Err(SchemaError::DuplicateName {
                    name: d.name().to_string(),
                });
            }
        }
        Ok(Self {
            descriptors,
            by_name,
            generation: SchemaGeneration::next(),
        })
    }

    /// A schema with no attributes.
    pub fn empty() -> Self {
        Self {
            descriptors: Vec::new(),
            by_name: IndexMap::new(),
            generation: SchemaGeneration::next(),
        }
    }

    /// Wrap in an `Arc` for sharing with storage.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Unique token identifying this schema.
    pub fn generation(&self) -> SchemaGeneration {
        self.generation
    }

    /// Descriptor for an attribute, if it exists.
    pub fn get(&self, attribute: AttributeId) -> Option<&AttributeDescriptor> {
        self.descriptors.get(attribute.index())
    }

    /// Look up an attribute by name.
    pub fn id_of(&self, name: &str) -> Option<AttributeId> {
        self.by_name.get(name).copied()
    }

    /// All descriptors in buffer order.
    pub fn descriptors(&self) -> &[AttributeDescriptor] {
        &self.descriptors
    }

    /// Iterate `(id, descriptor)` pairs in buffer order.
    pub fn iter(&self) -> impl Iterator<Item = (AttributeId, &AttributeDescriptor)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (AttributeId(i as u32), d))
    }

    /// Attributes whose GPU-sync flag is set.
    pub fn gpu_synced(&self) -> impl Iterator<Item = (AttributeId, &AttributeDescriptor)> {
        self.iter().filter(|(_, d)| d.gpu_sync())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Whether the schema has no attributes.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Sum of per-voxel strides across all attributes.
    pub fn voxel_bytes(&self) -> usize {
        self.descriptors.iter().map(AttributeDescriptor::stride).sum()
    }
}

impl Default for AttributeSchema {
    fn default() -> Self {
        Self::empty()
    }
}
