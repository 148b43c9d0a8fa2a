//! The chunk index grid: one slot reference per chunk-sized region.

use sparsevox_core::SlotIndex;

/// Dense 3D array of slot indices, one per chunk-grid cell.
///
/// A cell holding [`SlotIndex::EMPTY`] has no storage allocated; any voxel
/// in it reads as zero.
#[derive(Clone, Debug, Default)]
pub struct ChunkIndexGrid {
    cells: Vec<u32>,
}

impl ChunkIndexGrid {
    /// A grid of `cell_count` empty cells.
    pub fn new(cell_count: usize) -> Self {
        let mut cells = Vec::new();
        // Exact-size allocation; the grid never grows after configuration.
        cells.reserve_exact(cell_count);
        cells.resize(cell_count, SlotIndex::EMPTY.0);
        Self { cells }
    }

    /// Drop every reference and resize to `cell_count` empty cells.
    pub fn reset(&mut self, cell_count: usize) {
        self.cells.clear();
        self.cells.shrink_to(cell_count);
        self.cells.resize(cell_count, SlotIndex::EMPTY.0);
    }

    /// Slot referenced by a cell.
    ///
    /// # Panics
    ///
    /// Panics if `cell` is out of range.
    #[inline]
    pub fn get(&self, cell: usize) -> SlotIndex {
        SlotIndex(self.cells[cell])
    }

    /// Point a cell at a slot (or at [`SlotIndex::EMPTY`]).
    ///
    /// # Panics
    ///
    /// Panics if `cell` is out of range.
    #[inline]
    pub fn set(&mut self, cell: usize, slot: SlotIndex) {
        self.cells[cell] = slot.0;
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate `(cell, slot)` for every allocated cell, in cell order.
    pub fn iter_allocated(&self) -> impl Iterator<Item = (usize, SlotIndex)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &s)| s != SlotIndex::EMPTY.0)
            .map(|(cell, &s)| (cell, SlotIndex(s)))
    }

    /// Number of allocated cells.
    pub fn allocated_count(&self) -> usize {
        self.iter_allocated().count()
    }

    /// Raw cell values, for consumers that mirror the grid elsewhere.
    pub fn as_slice(&self) -> &[u32] {
        &self.cells
    }

    /// Memory usage of the grid in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.cells.capacity() * std::mem::size_of::<u32>()
    }
}
