//! Occupancy and memory statistics.

/// Snapshot of a storage's occupancy and memory use.
///
/// Produced by [`DynamicVoxelStorage::stats()`](crate::DynamicVoxelStorage::stats).
/// Reuse counters are cumulative since the last configure, clear, or
/// schema change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StorageStats {
    /// Slots ever allocated (live + reusable).
    pub allocated_slots: usize,
    /// Slots referenced by the chunk grid.
    pub live_slots: usize,
    /// Slots on the reuse stack.
    pub reusable_slots: usize,
    /// Voxels with at least one non-zero attribute byte.
    pub live_voxels: u64,
    /// Number of chunk-grid cells.
    pub grid_cells: usize,
    /// Bytes held by the grid and all attribute buffers.
    pub memory_bytes: usize,
    /// Slot requests served from the reuse stack.
    pub reuse_hits: u64,
    /// Slot requests that grew the buffers.
    pub reuse_misses: u64,
}

impl StorageStats {
    /// Fraction of allocated slots currently on the reuse stack.
    pub fn fragmentation(&self) -> f64 {
        if self.allocated_slots == 0 {
            0.0
        } else {
            self.reusable_slots as f64 / self.allocated_slots as f64
        }
    }
}
