//! Reusable schemas and storages.
//!
//! - [`single_i32_schema`]: one scalar `i32` attribute.
//! - [`terrain_schema`]: `material: i8`, `density: f32`, `color: 3 x f32`,
//!   `normal: 3 x i16` widened to 4-byte components.
//! - [`single_i32_storage`], [`terrain_storage`]: those schemas laid out
//!   over a cubic volume.

use std::sync::Arc;

use sparsevox_core::{AttributeDescriptor, AttributeId, AttributeSchema, AttributeType};
use sparsevox_storage::{DynamicVoxelStorage, VolumeConfig};

pub const MATERIAL: AttributeId = AttributeId(0);
pub const DENSITY: AttributeId = AttributeId(1);
pub const COLOR: AttributeId = AttributeId(2);
pub const NORMAL: AttributeId = AttributeId(3);

fn shared(descriptors: Vec<AttributeDescriptor>) -> Arc<AttributeSchema> {
    match AttributeSchema::new(descriptors) {
        Ok(schema) => schema.into_shared(),
        Err(e) => panic!("fixture schema rejected: {e}"),
    }
}

pub fn single_i32_schema() -> Arc<AttributeSchema> {
    shared(vec![AttributeDescriptor::new("value", AttributeType::Int32)])
}

pub fn terrain_schema() -> Arc<AttributeSchema> {
    shared(vec![
        AttributeDescriptor::new("material", AttributeType::Int8),
        AttributeDescriptor::new("density", AttributeType::Float32).with_gpu_sync(false),
        AttributeDescriptor::new("color", AttributeType::Float32).with_components(3),
        AttributeDescriptor::new("normal", AttributeType::Int16)
            .with_components(3)
            .with_component_size(4),
    ])
}

fn storage(schema: Arc<AttributeSchema>, extent: usize, chunk_size: usize) -> DynamicVoxelStorage {
    let config = VolumeConfig::new(extent, extent, extent, chunk_size);
    match DynamicVoxelStorage::with_schema(schema, config) {
        Ok(s) => s,
        Err(e) => panic!("fixture config rejected: {e}"),
    }
}

pub fn single_i32_storage(extent: usize, chunk_size: usize) -> DynamicVoxelStorage {
    storage(single_i32_schema(), extent, chunk_size)
}

pub fn terrain_storage(extent: usize, chunk_size: usize) -> DynamicVoxelStorage {
    storage(terrain_schema(), extent, chunk_size)
}

/// Deterministic pseudo-random coordinates inside a cube of edge `extent`.
///
/// A fixed-increment LCG, so benchmark and test inputs repeat exactly.
pub fn scattered_coords(count: usize, extent: usize, seed: u64) -> Vec<[usize; 3]> {
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as usize) % extent
    };
    (0..count).map(|_| [next(), next(), next()]).collect()
}
