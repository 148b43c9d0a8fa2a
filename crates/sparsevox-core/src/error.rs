//! Schema construction errors.

use std::error::Error;
use std::fmt;

/// Errors from building an [`AttributeSchema`](crate::AttributeSchema).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two descriptors share a name.
    DuplicateName {
        /// The repeated attribute name.
        name: String,
    },
    /// More descriptors than an [`AttributeId`](crate::AttributeId) can index.
    TooManyAttributes {
        /// Number of descriptors supplied.
        count: usize,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName { name } => write!(f, "duplicate attribute name '{name}'"),
            Self::TooManyAttributes { count } => {
                write!(f, "too many attributes: {count} exceeds u32 index range")
            }
        }
    }
}

impl Error for SchemaError {}
