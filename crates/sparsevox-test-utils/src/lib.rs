//! Test utilities for sparsevox development.
//!
//! Canonical schemas and storages live in [`fixtures`]. The invariant
//! checks here recount storage state from the raw buffers, independently
//! of the storage's own bookkeeping, so tests can compare the two.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use sparsevox_core::SlotIndex;
use sparsevox_storage::DynamicVoxelStorage;

/// Number of voxels in `slot` with at least one non-zero byte in any
/// attribute buffer.
pub fn count_live_voxels(storage: &DynamicVoxelStorage, slot: SlotIndex) -> u32 {
    let vps = storage.layout().voxels_per_slot();
    let buffers: Vec<(&[u8], usize)> = storage
        .schema()
        .iter()
        .filter_map(|(id, d)| Some((storage.attribute_buffer(id)?, d.stride())))
        .collect();
    let mut live = 0;
    for voxel in 0..vps {
        let any_set = buffers.iter().any(|&(buffer, stride)| {
            let start = (slot.index() * vps + voxel) * stride;
            buffer[start..start + stride].iter().any(|&b| b != 0)
        });
        if any_set {
            live += 1;
        }
    }
    live
}

/// Panic with a description of the first slot whose live-voxel counter
/// disagrees with its buffer contents, or whose grid and reuse-stack
/// membership is inconsistent.
pub fn assert_storage_consistent(storage: &DynamicVoxelStorage) {
    let allocated = storage.allocated_slot_count();
    let mut referenced = vec![false; allocated];
    for (coords, slot) in storage.populated_chunks() {
        assert!(
            slot.index() < allocated,
            "chunk {coords:?} references unallocated slot {slot}"
        );
        assert!(
            !referenced[slot.index()],
            "slot {slot} referenced by more than one chunk"
        );
        referenced[slot.index()] = true;
    }

    for &slot in storage.reusable_slots() {
        assert!(
            !referenced[slot.index()],
            "slot {slot} is both referenced and reusable"
        );
    }

    for (i, &is_referenced) in referenced.iter().enumerate() {
        let slot = SlotIndex(i as u32);
        let counted = count_live_voxels(storage, slot);
        assert_eq!(
            storage.slot_live_voxels(slot),
            Some(counted),
            "slot {slot}: counter disagrees with buffer contents"
        );
        if is_referenced {
            assert!(counted > 0, "referenced slot {slot} holds no live voxel");
        } else {
            assert_eq!(counted, 0, "unreferenced slot {slot} holds live voxels");
        }
    }

    let unreferenced = referenced.iter().filter(|&&r| !r).count();
    assert_eq!(
        storage.reusable_slots().len(),
        unreferenced,
        "reuse stack does not cover every unreferenced slot"
    );
}
