//! Storage-specific error types.

use std::error::Error;
use std::fmt;

use sparsevox_core::{AttributeId, AttributeType};

/// Errors that can occur during storage operations.
///
/// Every checked operation that returns one of these has left the storage
/// exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageError {
    /// The numeric kind of a typed access does not match the attribute's
    /// declared type.
    SchemaMismatch {
        /// The attribute accessed.
        attribute: AttributeId,
        /// Type declared by the schema.
        expected: AttributeType,
        /// Type of the requested numeric kind.
        requested: AttributeType,
    },
    /// A vector access used a component count different from the schema's.
    ComponentCountMismatch {
        /// The attribute accessed.
        attribute: AttributeId,
        /// Component count declared by the schema.
        expected: usize,
        /// Component count of the vector passed.
        requested: usize,
    },
    /// A chunk slot was needed but no attribute buffers exist.
    AllocationExhausted {
        /// Number of attributes in the current schema.
        attributes: usize,
    },
    /// The allocator could not provide memory for a new chunk slot.
    AllocationFailed {
        /// Bytes requested for the buffer that failed to grow.
        bytes: usize,
    },
    /// A voxel coordinate lies outside the configured volume.
    OutOfRange {
        /// Requested x.
        x: usize,
        /// Requested y.
        y: usize,
        /// Requested z.
        z: usize,
        /// Configured (rounded) width.
        width: usize,
        /// Configured (rounded) height.
        height: usize,
        /// Configured (rounded) depth.
        depth: usize,
    },
    /// An attribute index beyond the schema.
    AttributeOutOfRange {
        /// The requested attribute.
        attribute: AttributeId,
        /// Number of attributes in the schema.
        count: usize,
    },
    /// A component index beyond the attribute's component count.
    ComponentOutOfRange {
        /// The attribute accessed.
        attribute: AttributeId,
        /// The requested component.
        component: usize,
        /// Component count declared by the schema.
        count: usize,
    },
    /// The volume configuration cannot be laid out.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch {
                attribute,
                expected,
                requested,
            } => write!(
                f,
                "attribute {attribute} is declared {expected}, access used {requested}"
            ),
            Self::ComponentCountMismatch {
                attribute,
                expected,
                requested,
            } => write!(
                f,
                "attribute {attribute} has {expected} components, access used {requested}"
            ),
            Self::AllocationExhausted { attributes } => write!(
                f,
                "cannot allocate voxel chunk: {attributes} attribute buffers defined"
            ),
            Self::AllocationFailed { bytes } => {
                write!(f, "cannot allocate voxel chunk: {bytes} bytes unavailable")
            }
            Self::OutOfRange {
                x,
                y,
                z,
                width,
                height,
                depth,
            } => write!(
                f,
                "voxel ({x}, {y}, {z}) outside volume {width}x{height}x{depth}"
            ),
            Self::AttributeOutOfRange { attribute, count } => {
                write!(f, "attribute {attribute} out of range (schema has {count})")
            }
            Self::ComponentOutOfRange {
                attribute,
                component,
                count,
            } => write!(
                f,
                "component {component} out of range for attribute {attribute} ({count} components)"
            ),
            Self::InvalidConfig { reason } => write!(f, "invalid volume config: {reason}"),
        }
    }
}

impl Error for StorageError {}
