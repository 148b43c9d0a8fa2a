//! Core types for sparsevox voxel attribute storage.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! attribute schema that storage consults but does not own: attribute types,
//! descriptors, the immutable [`AttributeSchema`], the numeric
//! [`Component`] kinds accepted by typed writes, and identifiers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod attribute;
pub mod component;
pub mod error;
pub mod id;
pub mod schema;

pub use attribute::{AttributeDescriptor, AttributeType};
pub use component::{Component, Number};
pub use error::SchemaError;
pub use id::{AttributeId, SchemaGeneration, SlotIndex};
pub use schema::AttributeSchema;
