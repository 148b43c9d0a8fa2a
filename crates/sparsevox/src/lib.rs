//! Sparsevox: sparse, chunked storage for typed per-voxel attributes.
//!
//! This is the top-level facade crate that re-exports the public API of the
//! sparsevox sub-crates. Adding `sparsevox` as a single dependency is
//! enough for most users.
//!
//! # Quick start
//!
//! ```rust
//! use sparsevox::prelude::*;
//!
//! let schema = AttributeSchema::new(vec![
//!     AttributeDescriptor::new("material", AttributeType::Int8),
//!     AttributeDescriptor::new("color", AttributeType::Float32).with_components(3),
//! ])
//! .unwrap()
//! .into_shared();
//! let material = schema.id_of("material").unwrap();
//! let color = schema.id_of("color").unwrap();
//!
//! let mut storage =
//!     DynamicVoxelStorage::with_schema(schema, VolumeConfig::new(64, 64, 64, 16)).unwrap();
//!
//! // Zero writes into empty regions allocate nothing.
//! storage.set_attribute_component(material, 3, 4, 5, 0, 0i8).unwrap();
//! assert_eq!(storage.allocated_slot_count(), 0);
//!
//! storage.set_attribute_vector(color, 3, 4, 5, [1.0f32, 0.5, 0.0]).unwrap();
//! assert_eq!(
//!     storage.get_attribute_vector::<f32, 3>(color, 3, 4, 5).unwrap(),
//!     [1.0, 0.5, 0.0]
//! );
//!
//! // Zeroing the chunk's last live voxel frees its slot for reuse.
//! storage.set_attribute_vector(color, 3, 4, 5, [0.0f32; 3]).unwrap();
//! assert_eq!(storage.reusable_slots().len(), 1);
//!
//! // Numeric kinds are checked against the declared type.
//! assert!(matches!(
//!     storage.set_attribute_component(material, 0, 0, 0, 0, 1.0f32),
//!     Err(StorageError::SchemaMismatch { .. })
//! ));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `sparsevox-core` | Attribute types, descriptors, schemas, IDs, numeric kinds |
//! | [`storage`] | `sparsevox-storage` | Storage façade, config, layout, codec, slab |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Schema types, IDs, and numeric kinds (`sparsevox-core`).
///
/// Build an [`types::AttributeSchema`] from [`types::AttributeDescriptor`]s
/// and share it with one or more storages.
pub use sparsevox_core as types;

/// Sparse chunked storage (`sparsevox-storage`).
///
/// [`storage::DynamicVoxelStorage`] is the entry point; the lower-level
/// modules are public for consumers that mirror buffers elsewhere.
pub use sparsevox_storage as storage;

/// Common imports for typical sparsevox usage.
///
/// ```rust
/// use sparsevox::prelude::*;
/// ```
pub mod prelude {
    // Schema
    pub use sparsevox_core::{
        AttributeDescriptor, AttributeId, AttributeSchema, AttributeType, Component,
        SchemaGeneration, SlotIndex,
    };

    // Errors
    pub use sparsevox_core::SchemaError;
    pub use sparsevox_storage::StorageError;

    // Storage
    pub use sparsevox_storage::{
        DynamicVoxelStorage, RoundingRule, StorageStats, VolumeConfig,
    };
}
