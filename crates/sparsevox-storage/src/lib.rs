//! Sparse, chunked storage for typed per-voxel attributes.
//!
//! Memory is allocated only for chunks that hold non-zero data. Each
//! attribute of the schema gets one contiguous byte buffer holding every
//! allocated chunk slot; a dense grid maps chunk-sized regions of the volume
//! to slots. Writing zeros back over a chunk's last live voxel returns its
//! slot to a reuse stack.
//!
//! # Architecture
//!
//! ```text
//! DynamicVoxelStorage (façade)
//! ├── Arc<AttributeSchema> (shared, read-only; replacing it wipes storage)
//! ├── ChunkLayout (extents, chunk size, addressing math)
//! ├── ChunkIndexGrid (cell → SlotIndex | EMPTY)
//! ├── AttributeBuffer × attributes (slot-major bytes, little-endian)
//! └── ChunkSlab (per-slot live-voxel counters + LIFO reuse stack)
//! ```
//!
//! # Checked and unchecked access
//!
//! Every typed read and write comes in a checked form returning
//! `Result<_, StorageError>` and an `_unchecked` form for hot loops that
//! skips validation. Unchecked calls never cause memory unsafety, but an
//! out-of-range argument panics or addresses the wrong voxel.
//!
//! # Concurrency
//!
//! Single writer. All mutation goes through `&mut self`; share across
//! threads behind a lock if needed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod slab;
pub mod stats;
pub mod storage;

// Public re-exports for the primary API surface.
pub use config::{RoundingRule, VolumeConfig};
pub use error::StorageError;
pub use layout::ChunkLayout;
pub use stats::StorageStats;
pub use storage::DynamicVoxelStorage;
