//! Chunk slot allocator with a LIFO reuse stack.
//!
//! [`ChunkSlab`] hands out chunk slots to the storage façade. A slot is an
//! index that is valid in every attribute buffer at once. New slots are
//! appended to the end of all buffers in lockstep; freed slots go onto a
//! reuse stack and are handed out again, most recently freed first, before
//! any buffer grows.
//!
//! Slots are never moved or compacted. A reclaimed slot keeps its bytes,
//! which are all zero because a slot is only reclaimed once its last live
//! voxel has been zeroed.

use sparsevox_core::SlotIndex;

use crate::buffer::AttributeBuffer;
use crate::error::StorageError;
use crate::grid::ChunkIndexGrid;

/// CPU-side bookkeeping for one allocated slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocatedChunkInfo {
    /// Number of voxels in the slot with at least one non-zero byte.
    pub voxel_counter: u32,
}

/// Slot allocator and free list.
#[derive(Clone, Debug, Default)]
pub struct ChunkSlab {
    /// One entry per slot ever allocated (live or reusable).
    info: Vec<AllocatedChunkInfo>,
    /// Freed slots, popped from the end.
    reusable: Vec<SlotIndex>,
    /// `next_slot()` calls satisfied from the reuse stack.
    reuse_hits: u64,
    /// `next_slot()` calls that grew the buffers.
    reuse_misses: u64,
}

impl ChunkSlab {
    /// An empty slab.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one slot to every attribute buffer.
    ///
    /// The new slot's index is derived from the length of buffer 0, which
    /// assumes all buffers have grown in lockstep. Fails with
    /// [`StorageError::AllocationExhausted`] when there are no buffers or
    /// the index would collide with [`SlotIndex::EMPTY`], and with
    /// [`StorageError::AllocationFailed`] when a buffer cannot grow; no
    /// buffer changes length on failure.
    pub fn allocate_new_slot(
        &mut self,
        buffers: &mut [AttributeBuffer],
        voxels_per_slot: usize,
    ) -> Result<SlotIndex, StorageError> {
        let exhausted = StorageError::AllocationExhausted {
            attributes: buffers.len(),
        };
        let Some(first) = buffers.first() else {
            return Err(exhausted);
        };
        let index = first.slot_count(voxels_per_slot);
        let slot = match u32::try_from(index) {
            Ok(i) if i != SlotIndex::EMPTY.0 => SlotIndex(i),
            _ => return Err(exhausted),
        };

        for buffer in buffers.iter_mut() {
            if buffer.reserve_one_slot(voxels_per_slot).is_err() {
                return Err(StorageError::AllocationFailed {
                    bytes: voxels_per_slot * buffer.stride(),
                });
            }
        }
        if self.info.len() <= index {
            self.info.resize(index + 1, AllocatedChunkInfo::default());
        }
        for buffer in buffers.iter_mut() {
            buffer.grow_one_slot(voxels_per_slot);
        }
        log::trace!("allocated chunk slot {slot}");
        Ok(slot)
    }

    /// A slot to write into: the most recently freed one, or a new one.
    pub fn next_slot(
        &mut self,
        buffers: &mut [AttributeBuffer],
        voxels_per_slot: usize,
    ) -> Result<SlotIndex, StorageError> {
        if let Some(slot) = self.reusable.pop() {
            self.reuse_hits += 1;
            log::trace!("reusing chunk slot {slot}");
            return Ok(slot);
        }
        match self.allocate_new_slot(buffers, voxels_per_slot) {
            Ok(slot) => {
                self.reuse_misses += 1;
                Ok(slot)
            }
            Err(e) => {
                log::error!("{e}");
                Err(e)
            }
        }
    }

    /// Record a voxel in `slot` going from all-zero to non-zero.
    #[inline]
    pub fn mark_voxel_live(&mut self, slot: SlotIndex) {
        self.info[slot.index()].voxel_counter += 1;
    }

    /// Record a voxel in `slot` going from non-zero to all-zero.
    ///
    /// Returns `true` when the slot has no live voxels left and should be
    /// reclaimed.
    #[inline]
    pub fn mark_voxel_dead(&mut self, slot: SlotIndex) -> bool {
        let info = &mut self.info[slot.index()];
        debug_assert!(info.voxel_counter > 0, "voxel counter underflow in slot {slot}");
        info.voxel_counter = info.voxel_counter.saturating_sub(1);
        info.voxel_counter == 0
    }

    /// Return a slot to the reuse stack and clear the grid cell that
    /// referenced it.
    pub fn reclaim(&mut self, slot: SlotIndex, grid: &mut ChunkIndexGrid, cell: usize) {
        grid.set(cell, SlotIndex::EMPTY);
        self.reusable.push(slot);
        log::trace!("reclaimed chunk slot {slot} from cell {cell}");
    }

    /// Live-voxel count of a slot, or `None` if it was never allocated.
    pub fn live_voxels(&self, slot: SlotIndex) -> Option<u32> {
        self.info.get(slot.index()).map(|i| i.voxel_counter)
    }

    /// The reuse stack; the last element is handed out next.
    pub fn reusable(&self) -> &[SlotIndex] {
        &self.reusable
    }

    /// Total slots ever allocated (live + reusable).
    pub fn slot_count(&self) -> usize {
        self.info.len()
    }

    /// Slots currently referenced by the grid.
    pub fn live_slot_count(&self) -> usize {
        self.info.len() - self.reusable.len()
    }

    /// Sum of live-voxel counters across all slots.
    pub fn live_voxel_total(&self) -> u64 {
        self.info.iter().map(|i| u64::from(i.voxel_counter)).sum()
    }

    /// Number of `next_slot()` calls served from the reuse stack.
    pub fn reuse_hits(&self) -> u64 {
        self.reuse_hits
    }

    /// Number of `next_slot()` calls that grew the buffers.
    pub fn reuse_misses(&self) -> u64 {
        self.reuse_misses
    }

    /// Rebuild the reuse stack from the grid.
    ///
    /// A slot is free exactly when no grid cell references it, so the stack
    /// need not be persisted. Free slots are stacked so the lowest index is
    /// handed out first.
    pub fn rebuild_free_list(&mut self, grid: &ChunkIndexGrid) {
        let mut referenced = vec![false; self.info.len()];
        for (_, slot) in grid.iter_allocated() {
            if let Some(r) = referenced.get_mut(slot.index()) {
                *r = true;
            }
        }
        self.reusable = referenced
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, &r)| !r)
            .map(|(i, _)| SlotIndex(i as u32))
            .collect();
    }
}
