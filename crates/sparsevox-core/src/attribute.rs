//! Attribute types and descriptors.

use std::fmt;

/// Numeric type of each component of an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// 32-bit IEEE-754 float.
    Float32,
    /// 64-bit IEEE-754 float.
    Float64,
    /// 8-bit integer.
    Int8,
    /// 16-bit integer.
    Int16,
    /// 32-bit integer.
    Int32,
    /// 64-bit integer.
    Int64,
}

impl AttributeType {
    /// All attribute types, in declaration order.
    pub const ALL: [AttributeType; 6] = [
        Self::Float32,
        Self::Float64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
    ];

    /// Byte width of one component of this type.
    pub fn natural_size(self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 | Self::Int64 => 8,
        }
    }

    /// Whether whole vectors of this type are stored in one packed pass.
    ///
    /// Only applies when the descriptor's component size equals the
    /// natural size; see the storage codec.
    pub fn packs_natively(self) -> bool {
        matches!(self, Self::Float32 | Self::Int32)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float32 => "f32",
            Self::Float64 => "f64",
            Self::Int8 => "i8",
            Self::Int16 => "i16",
            Self::Int32 => "i32",
            Self::Int64 => "i64",
        };
        f.write_str(name)
    }
}

/// Describes one per-voxel attribute channel.
///
/// Component count is clamped to `1..=4` and component size is clamped up
/// to the type's natural size, so a descriptor is always well-formed.
/// The GPU-sync flag is opaque metadata: storage preserves it for consumers
/// and never interprets it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeDescriptor {
    name: String,
    attribute_type: AttributeType,
    components: usize,
    component_size: usize,
    gpu_sync: bool,
}

impl AttributeDescriptor {
    /// Largest supported component count.
    pub const MAX_COMPONENTS: usize = 4;

    /// A single-component descriptor of the given type at its natural size.
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
            components: 1,
            component_size: attribute_type.natural_size(),
            gpu_sync: true,
        }
    }

    /// Set the component count, clamped to `1..=4`.
    pub fn with_components(mut self, components: usize) -> Self {
        self.components = components.clamp(1, Self::MAX_COMPONENTS);
        self
    }

    /// Set the per-component byte size, clamped up to the natural size.
    pub fn with_component_size(mut self, component_size: usize) -> Self {
        self.component_size = component_size.max(self.minimum_component_size());
        self
    }

    /// Change the numeric type. The component size is re-clamped.
    pub fn with_type(mut self, attribute_type: AttributeType) -> Self {
        self.attribute_type = attribute_type;
        self.component_size = self.component_size.max(attribute_type.natural_size());
        self
    }

    /// Set the GPU-sync flag.
    pub fn with_gpu_sync(mut self, gpu_sync: bool) -> Self {
        self.gpu_sync = gpu_sync;
        self
    }

    /// Human-readable attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared component type.
    pub fn attribute_type(&self) -> AttributeType {
        self.attribute_type
    }

    /// Number of components per voxel (1..=4).
    pub fn components(&self) -> usize {
        self.components
    }

    /// Bytes per component.
    pub fn component_size(&self) -> usize {
        self.component_size
    }

    /// Smallest legal component size for the declared type.
    pub fn minimum_component_size(&self) -> usize {
        self.attribute_type.natural_size()
    }

    /// Whether consumers should mirror this attribute to the GPU.
    pub fn gpu_sync(&self) -> bool {
        self.gpu_sync
    }

    /// Bytes per voxel: `components * component_size`.
    pub fn stride(&self) -> usize {
        self.components * self.component_size
    }
}
