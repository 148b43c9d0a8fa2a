//! Integration test: the single-attribute write/zero/reuse lifecycle.
//!
//! A 64³ volume with 16³ chunks and one scalar `i32` attribute. Writing a
//! non-zero value allocates slot 0 for chunk cell 0; writing zero back
//! drops the slot's counter to zero, pushes it onto the reuse stack, and
//! empties the cell.

use sparsevox_core::{AttributeId, SlotIndex};
use sparsevox_storage::StorageError;
use sparsevox_test_utils::assert_storage_consistent;
use sparsevox_test_utils::fixtures::single_i32_storage;

const VALUE: AttributeId = AttributeId(0);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn write_then_zero_returns_slot_to_reuse_stack() {
    init_logging();
    let mut storage = single_i32_storage(64, 16);
    assert_eq!(storage.chunk_grid()[0], u32::MAX);

    storage.set_attribute_vector(VALUE, 0, 0, 0, [7i32]).unwrap();
    assert_eq!(storage.chunk_grid()[0], 0);
    assert_eq!(storage.slot_live_voxels(SlotIndex(0)), Some(1));
    assert_eq!(storage.get_attribute_vector::<i32, 1>(VALUE, 0, 0, 0).unwrap(), [7]);
    assert_storage_consistent(&storage);

    storage.set_attribute_vector(VALUE, 0, 0, 0, [0i32]).unwrap();
    assert_eq!(storage.slot_live_voxels(SlotIndex(0)), Some(0));
    assert_eq!(storage.reusable_slots(), &[SlotIndex(0)]);
    assert_eq!(storage.chunk_grid()[0], u32::MAX);
    assert_storage_consistent(&storage);

    // The next allocation anywhere takes the freed slot.
    storage.set_attribute_vector(VALUE, 70, 70, 70, [1i32]).unwrap();
    assert_eq!(storage.chunk_slot(70, 70, 70).unwrap(), SlotIndex(0));
    assert_eq!(storage.allocated_slot_count(), 1);
    assert!(storage.reusable_slots().is_empty());
}

#[test]
fn default_rounding_bumps_exact_multiples() {
    init_logging();
    let storage = single_i32_storage(64, 16);
    assert_eq!(
        (storage.width(), storage.height(), storage.depth()),
        (80, 80, 80)
    );
    assert_eq!(storage.chunk_grid().len(), 5 * 5 * 5);

    let rounded = single_i32_storage(100, 32);
    assert_eq!(rounded.width(), 128);
}

#[test]
fn checked_writes_outside_volume_are_rejected() {
    init_logging();
    let mut storage = single_i32_storage(64, 16);
    assert_eq!(
        storage.set_attribute_vector(VALUE, 80, 0, 0, [1i32]),
        Err(StorageError::OutOfRange {
            x: 80,
            y: 0,
            z: 0,
            width: 80,
            height: 80,
            depth: 80,
        })
    );
    assert_eq!(storage.allocated_slot_count(), 0);
}

#[test]
fn a_full_chunk_is_reclaimed_only_by_its_last_voxel() {
    init_logging();
    let mut storage = single_i32_storage(16, 4);
    for z in 0..4 {
        for y in 0..4 {
            for x in 0..4 {
                storage.set_attribute_component(VALUE, x, y, z, 0, 1i32).unwrap();
            }
        }
    }
    let slot = storage.chunk_slot(0, 0, 0).unwrap();
    assert_eq!(storage.slot_live_voxels(slot), Some(64));

    for z in 0..4 {
        for y in 0..4 {
            for x in 0..4 {
                assert!(!storage.chunk_slot(x, y, z).unwrap().is_empty());
                storage.set_attribute_component(VALUE, x, y, z, 0, 0i32).unwrap();
            }
        }
    }
    assert!(storage.chunk_slot(0, 0, 0).unwrap().is_empty());
    assert_eq!(storage.reusable_slots(), &[slot]);
    assert_storage_consistent(&storage);
}
