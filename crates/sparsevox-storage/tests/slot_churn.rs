//! Integration test: slot reuse under sparse write churn.
//!
//! Repeatedly fills and clears scattered voxels and checks that the slab
//! never grows past the peak number of simultaneously live chunks, and
//! that counters, grid, and reuse stack stay consistent throughout.

use sparsevox_storage::DynamicVoxelStorage;
use sparsevox_test_utils::assert_storage_consistent;
use sparsevox_test_utils::fixtures::{scattered_coords, terrain_storage, COLOR, DENSITY, MATERIAL};

fn live_chunks(storage: &DynamicVoxelStorage) -> usize {
    storage.populated_chunks().count()
}

#[test]
fn churn_does_not_grow_slab_past_peak() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut storage = terrain_storage(64, 8);
    let mut peak = 0usize;

    for round in 0..20u64 {
        let coords = scattered_coords(200, 64, round);
        for (i, [x, y, z]) in coords.iter().copied().enumerate() {
            if i % 2 == 0 {
                storage.set_attribute_component(MATERIAL, x, y, z, 0, 1i8).unwrap();
            } else {
                storage
                    .set_attribute_vector(COLOR, x, y, z, [0.5f32, 0.25, 1.0])
                    .unwrap();
            }
        }
        peak = peak.max(live_chunks(&storage));
        assert_storage_consistent(&storage);

        for (i, [x, y, z]) in coords.iter().copied().enumerate() {
            if i % 2 == 0 {
                storage.set_attribute_component(MATERIAL, x, y, z, 0, 0i8).unwrap();
            } else {
                storage
                    .set_attribute_vector(COLOR, x, y, z, [0.0f32; 3])
                    .unwrap();
            }
        }
        assert_eq!(live_chunks(&storage), 0, "round {round} left chunks populated");
        assert_storage_consistent(&storage);
    }

    let stats = storage.stats();
    assert!(stats.allocated_slots <= peak);
    assert_eq!(stats.live_voxels, 0);
    assert_eq!(stats.reusable_slots, stats.allocated_slots);
    assert_eq!(stats.fragmentation(), 1.0);
    assert!(stats.reuse_hits > 0);
}

#[test]
fn memory_is_flat_once_slots_are_recycled() {
    let mut storage = terrain_storage(64, 8);
    let coords = scattered_coords(500, 64, 7);

    let fill = |storage: &mut DynamicVoxelStorage, value: f32| {
        for &[x, y, z] in &coords {
            storage.set_attribute_component(DENSITY, x, y, z, 0, value).unwrap();
        }
    };

    fill(&mut storage, 1.0);
    fill(&mut storage, 0.0);
    let after_first = storage.stats().memory_bytes;
    for _ in 0..10 {
        fill(&mut storage, 2.0);
        fill(&mut storage, 0.0);
    }
    assert_eq!(storage.stats().memory_bytes, after_first);
}

#[test]
fn rebuilt_reuse_stack_hands_out_lowest_slot_first() {
    let mut storage = terrain_storage(32, 8);
    for x in [0, 8, 16, 24] {
        storage.set_attribute_component(MATERIAL, x, 0, 0, 0, 1i8).unwrap();
    }
    // Free slots 1 then 3; the incremental stack hands out 3 first.
    storage.set_attribute_component(MATERIAL, 8, 0, 0, 0, 0i8).unwrap();
    storage.set_attribute_component(MATERIAL, 24, 0, 0, 0, 0i8).unwrap();
    assert_eq!(storage.reusable_slots().last().map(|s| s.0), Some(3));

    storage.rebuild_reuse_stack();
    assert_eq!(storage.reusable_slots().last().map(|s| s.0), Some(1));
    storage.set_attribute_component(MATERIAL, 0, 8, 0, 0, 1i8).unwrap();
    assert_eq!(storage.chunk_slot(0, 8, 0).unwrap().0, 1);
    assert_storage_consistent(&storage);
}
