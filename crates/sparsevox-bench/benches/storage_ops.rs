//! Criterion micro-benchmarks for voxel writes, reads, and slot reuse.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use sparsevox_bench::{dense_profile, reference_profile, sparse_pattern};
use sparsevox_core::AttributeId;
use sparsevox_storage::DynamicVoxelStorage;
use sparsevox_test_utils::fixtures::{single_i32_schema, terrain_schema, COLOR, MATERIAL};

const VALUE: AttributeId = AttributeId(0);

fn make_single(config: sparsevox_storage::VolumeConfig) -> DynamicVoxelStorage {
    DynamicVoxelStorage::with_schema(single_i32_schema(), config).unwrap()
}

/// Benchmark: fill one 32³ chunk voxel by voxel (checked).
fn bench_fill_chunk_checked(c: &mut Criterion) {
    let coords = sparse_pattern(32, 1);
    c.bench_function("fill_chunk_checked_32", |b| {
        b.iter(|| {
            let mut storage = make_single(reference_profile());
            for &[x, y, z] in &coords {
                storage.set_attribute_component(VALUE, x, y, z, 0, 1i32).unwrap();
            }
            black_box(storage.stats().live_voxels);
        });
    });
}

/// Benchmark: same fill through the unchecked path.
fn bench_fill_chunk_unchecked(c: &mut Criterion) {
    let coords = sparse_pattern(32, 1);
    c.bench_function("fill_chunk_unchecked_32", |b| {
        b.iter(|| {
            let mut storage = make_single(reference_profile());
            for &[x, y, z] in &coords {
                storage.set_attribute_component_unchecked(VALUE, x, y, z, 0, 1i32);
            }
            black_box(storage.stats().live_voxels);
        });
    });
}

/// Benchmark: one voxel per chunk, the allocation-heavy worst case.
fn bench_scatter_one_per_chunk(c: &mut Criterion) {
    let coords = sparse_pattern(64, 8);
    c.bench_function("scatter_one_per_chunk_512", |b| {
        b.iter(|| {
            let mut storage = make_single(dense_profile());
            for &[x, y, z] in &coords {
                storage.set_attribute_component(VALUE, x, y, z, 0, 7i32).unwrap();
            }
            black_box(storage.allocated_slot_count());
        });
    });
}

/// Benchmark: set then clear every scattered voxel; slots cycle through
/// the reuse stack after the first pass.
fn bench_slot_churn(c: &mut Criterion) {
    let coords = sparse_pattern(64, 8);
    let mut storage = make_single(dense_profile());
    c.bench_function("slot_churn_512", |b| {
        b.iter(|| {
            for &[x, y, z] in &coords {
                storage.set_attribute_component(VALUE, x, y, z, 0, 1i32).unwrap();
            }
            for &[x, y, z] in &coords {
                storage.set_attribute_component(VALUE, x, y, z, 0, 0i32).unwrap();
            }
            black_box(storage.reusable_slots().len());
        });
    });
}

/// Benchmark: vector writes and reads on a multi-attribute schema.
fn bench_terrain_vectors(c: &mut Criterion) {
    let coords = sparse_pattern(64, 3);
    let mut storage = DynamicVoxelStorage::with_schema(terrain_schema(), dense_profile()).unwrap();
    c.bench_function("terrain_vector_write_read", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for &[x, y, z] in &coords {
                storage.set_attribute_component(MATERIAL, x, y, z, 0, 2i8).unwrap();
                storage
                    .set_attribute_vector(COLOR, x, y, z, [0.1f32, 0.2, 0.3])
                    .unwrap();
                let [r, g, b] = storage.get_attribute_vector::<f32, 3>(COLOR, x, y, z).unwrap();
                sum += r + g + b;
            }
            black_box(sum);
        });
    });
}

/// Benchmark: reads from an almost empty volume.
fn bench_read_empty(c: &mut Criterion) {
    let storage = make_single(reference_profile());
    let coords = sparse_pattern(256, 16);
    c.bench_function("read_unallocated_4096", |b| {
        b.iter(|| {
            let mut acc = 0i32;
            for &[x, y, z] in &coords {
                acc = acc.wrapping_add(storage.get_attribute_component_unchecked::<i32>(VALUE, x, y, z, 0));
            }
            black_box(acc);
        });
    });
}

criterion_group!(
    benches,
    bench_fill_chunk_checked,
    bench_fill_chunk_unchecked,
    bench_scatter_one_per_chunk,
    bench_slot_churn,
    bench_terrain_vectors,
    bench_read_empty
);
criterion_main!(benches);
