//! Addressing math: voxel coordinates to chunk cells, slots, and byte offsets.
//!
//! Every linearisation uses the same z-major ordering ([`index_3d`]); chunk
//! grid cells, voxels within a slot, and persisted grids all depend on it.

use sparsevox_core::{AttributeSchema, SlotIndex};

use crate::config::VolumeConfig;
use crate::error::StorageError;

/// Linear index of `(x, y, z)` in a `width x height x _` box, z-major.
#[inline]
pub fn index_3d(x: usize, y: usize, z: usize, width: usize, height: usize) -> usize {
    (z * width * height) + (y * width) + x
}

/// Precomputed extents for a configured volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkLayout {
    chunk_size: usize,
    extents: [usize; 3],
    grid: [usize; 3],
    cell_count: usize,
    voxels_per_slot: usize,
}

impl ChunkLayout {
    /// Lay out a volume, applying the config's rounding rule.
    pub fn new(config: &VolumeConfig) -> Result<Self, StorageError> {
        let extents = config.rounded_extents()?;
        let chunk_size = config.chunk_size;
        let grid = extents.map(|e| e / chunk_size);
        let overflow = |what: &str| StorageError::InvalidConfig {
            reason: format!("{what} overflows usize"),
        };
        let cell_count = grid[0]
            .checked_mul(grid[1])
            .and_then(|c| c.checked_mul(grid[2]))
            .ok_or_else(|| overflow("chunk grid cell count"))?;
        let voxels_per_slot = chunk_size
            .checked_mul(chunk_size)
            .and_then(|v| v.checked_mul(chunk_size))
            .ok_or_else(|| overflow("voxels per chunk"))?;
        Ok(Self {
            chunk_size,
            extents,
            grid,
            cell_count,
            voxels_per_slot,
        })
    }

    /// Chunk edge length in voxels.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Rounded width in voxels.
    pub fn width(&self) -> usize {
        self.extents[0]
    }

    /// Rounded height in voxels.
    pub fn height(&self) -> usize {
        self.extents[1]
    }

    /// Rounded depth in voxels.
    pub fn depth(&self) -> usize {
        self.extents[2]
    }

    /// Chunk-grid dimensions `[x, y, z]`.
    pub fn grid_dims(&self) -> [usize; 3] {
        self.grid
    }

    /// Number of chunk-grid cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    /// Voxels in one chunk slot (`chunk_size³`).
    pub fn voxels_per_slot(&self) -> usize {
        self.voxels_per_slot
    }

    /// Whether a voxel coordinate lies inside the volume.
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.extents[0] && y < self.extents[1] && z < self.extents[2]
    }

    /// Chunk-grid cell holding voxel `(x, y, z)`.
    #[inline]
    pub fn chunk_cell(&self, x: usize, y: usize, z: usize) -> usize {
        let c = self.chunk_size;
        index_3d(x / c, y / c, z / c, self.grid[0], self.grid[1])
    }

    /// Chunk coordinates `[cx, cy, cz]` of a grid cell.
    pub fn cell_coords(&self, cell: usize) -> [usize; 3] {
        let plane = self.grid[0] * self.grid[1];
        let z = cell / plane;
        let rem = cell % plane;
        [rem % self.grid[0], rem / self.grid[0], z]
    }

    /// Index of voxel `(x, y, z)` within its chunk slot.
    #[inline]
    pub fn voxel_in_slot(&self, x: usize, y: usize, z: usize) -> usize {
        let c = self.chunk_size;
        index_3d(x % c, y % c, z % c, c, c)
    }

    /// Bytes one slot occupies in a buffer of the given per-voxel stride,
    /// or `None` if that exceeds the largest possible allocation.
    pub fn slot_bytes(&self, stride: usize) -> Option<usize> {
        self.voxels_per_slot
            .checked_mul(stride)
            .filter(|&b| b <= isize::MAX as usize)
    }

    /// Check that one slot of every attribute in `schema` is addressable.
    pub fn check_schema(&self, schema: &AttributeSchema) -> Result<(), StorageError> {
        for descriptor in schema.descriptors() {
            if self.slot_bytes(descriptor.stride()).is_none() {
                return Err(StorageError::InvalidConfig {
                    reason: format!(
                        "slot of {} voxels x {} bytes for attribute '{}' overflows",
                        self.voxels_per_slot,
                        descriptor.stride(),
                        descriptor.name()
                    ),
                });
            }
        }
        Ok(())
    }

    /// Byte offset of a voxel's first component.
    #[inline]
    pub fn voxel_offset(&self, slot: SlotIndex, voxel: usize, stride: usize) -> usize {
        (slot.index() * self.voxels_per_slot + voxel) * stride
    }

    /// Byte offset of a single component of a voxel.
    #[inline]
    pub fn component_offset(
        &self,
        slot: SlotIndex,
        voxel: usize,
        components: usize,
        component_size: usize,
        component: usize,
    ) -> usize {
        ((slot.index() * self.voxels_per_slot + voxel) * components + component) * component_size
    }
}
