//! The dynamic voxel storage façade.
//!
//! [`DynamicVoxelStorage`] owns the chunk grid, the attribute buffers, and
//! the slab, and exposes typed reads and writes over voxel coordinates.
//!
//! # Write path
//!
//! 1. Validate (checked variants only): attribute index, coordinates,
//!    component index or count, numeric kind.
//! 2. Encode the value to the attribute's declared type. The write is a
//!    *zero write* when the encoded bytes are all zero.
//! 3. Look up the voxel's chunk slot. An empty chunk absorbs a zero write
//!    without allocating; any other write takes a slot from the slab.
//! 4. Store the bytes.
//! 5. Keep the slot's live-voxel counter exact: increment when the voxel
//!    goes from all-zero to non-zero across every attribute, decrement when
//!    it goes back, and reclaim the slot when the counter reaches zero.

use std::sync::Arc;

use smallvec::{smallvec, SmallVec};
use sparsevox_core::{
    AttributeDescriptor, AttributeId, AttributeSchema, Component, Number, SchemaGeneration,
    SlotIndex,
};

use crate::buffer::AttributeBuffer;
use crate::codec;
use crate::config::VolumeConfig;
use crate::error::StorageError;
use crate::grid::ChunkIndexGrid;
use crate::layout::ChunkLayout;
use crate::slab::ChunkSlab;
use crate::stats::StorageStats;

/// Sparse chunked storage for the attributes of one schema.
///
/// Holds a shared reference to its [`AttributeSchema`]; the schema is
/// never mutated through the storage. Handing the storage a new schema
/// with [`set_schema`](Self::set_schema) wipes all voxel data.
pub struct DynamicVoxelStorage {
    schema: Arc<AttributeSchema>,
    config: VolumeConfig,
    layout: ChunkLayout,
    grid: ChunkIndexGrid,
    /// One buffer per schema attribute, in schema order.
    buffers: Vec<AttributeBuffer>,
    slab: ChunkSlab,
}

impl DynamicVoxelStorage {
    /// Empty storage with no attributes.
    ///
    /// Non-zero writes fail with [`StorageError::AllocationExhausted`]
    /// until a schema is attached.
    pub fn new(config: VolumeConfig) -> Result<Self, StorageError> {
        Self::with_schema(AttributeSchema::empty().into_shared(), config)
    }

    /// Empty storage laid out for `schema`.
    pub fn with_schema(
        schema: Arc<AttributeSchema>,
        config: VolumeConfig,
    ) -> Result<Self, StorageError> {
        let layout = ChunkLayout::new(&config)?;
        layout.check_schema(&schema)?;
        let mut storage = Self {
            schema,
            config,
            layout,
            grid: ChunkIndexGrid::default(),
            buffers: Vec::new(),
            slab: ChunkSlab::new(),
        };
        storage.reset_contents();
        Ok(storage)
    }

    // ── Lifecycle ───────────────────────────────────────────────

    /// Lay out the volume again from `config`, discarding all voxel data.
    ///
    /// Fails with [`StorageError::InvalidConfig`] if the extents overflow or
    /// a slot of any attribute would be too large to allocate. On error the
    /// storage is unchanged.
    pub fn configure(&mut self, config: VolumeConfig) -> Result<(), StorageError> {
        let layout = ChunkLayout::new(&config)?;
        layout.check_schema(&self.schema)?;
        self.config = config;
        self.layout = layout;
        self.reset_contents();
        log::debug!(
            "configured voxel storage {}x{}x{} (chunk {}, {} cells)",
            layout.width(),
            layout.height(),
            layout.depth(),
            layout.chunk_size(),
            layout.cell_count()
        );
        Ok(())
    }

    /// Resize to the given extents and chunk size, discarding all voxel
    /// data. Keeps the current rounding rule.
    pub fn resize_and_clear(
        &mut self,
        width: usize,
        height: usize,
        depth: usize,
        chunk_size: usize,
    ) -> Result<(), StorageError> {
        let config =
            VolumeConfig::new(width, height, depth, chunk_size).with_rounding(self.config.rounding);
        self.configure(config)
    }

    /// Discard all voxel data, keeping the current extents and chunk size.
    pub fn clear(&mut self) {
        self.reset_contents();
    }

    /// Replace the schema. All voxel data is discarded and every buffer is
    /// rebuilt for the new descriptors, so no slot index from before the
    /// change remains valid.
    ///
    /// Fails with [`StorageError::InvalidConfig`] if a slot of one of the
    /// new attributes would be too large for the current chunk size; the
    /// storage is then unchanged.
    pub fn set_schema(&mut self, schema: Arc<AttributeSchema>) -> Result<(), StorageError> {
        self.layout.check_schema(&schema)?;
        log::debug!(
            "replacing schema {} ({} attributes) with {} ({} attributes)",
            self.schema.generation(),
            self.schema.len(),
            schema.generation(),
            schema.len()
        );
        self.schema = schema;
        self.reset_contents();
        Ok(())
    }

    fn reset_contents(&mut self) {
        self.grid.reset(self.layout.cell_count());
        self.buffers = self
            .schema
            .descriptors()
            .iter()
            .map(|d| AttributeBuffer::new(d.stride()))
            .collect();
        self.slab = ChunkSlab::new();
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The attached schema.
    pub fn schema(&self) -> &Arc<AttributeSchema> {
        &self.schema
    }

    /// Generation of the schema the buffers are laid out for.
    pub fn schema_generation(&self) -> SchemaGeneration {
        self.schema.generation()
    }

    /// The config last passed to [`configure`](Self::configure).
    pub fn config(&self) -> &VolumeConfig {
        &self.config
    }

    /// The current layout.
    pub fn layout(&self) -> &ChunkLayout {
        &self.layout
    }

    /// Chunk edge length in voxels.
    pub fn chunk_size(&self) -> usize {
        self.layout.chunk_size()
    }

    /// Width in voxels, after rounding.
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    /// Height in voxels, after rounding.
    pub fn height(&self) -> usize {
        self.layout.height()
    }

    /// Depth in voxels, after rounding.
    pub fn depth(&self) -> usize {
        self.layout.depth()
    }

    /// Slot holding the chunk that contains `(x, y, z)`.
    pub fn chunk_slot(&self, x: usize, y: usize, z: usize) -> Result<SlotIndex, StorageError> {
        self.check_bounds(x, y, z)?;
        Ok(self.grid.get(self.layout.chunk_cell(x, y, z)))
    }

    /// Whether any attribute of voxel `(x, y, z)` is non-zero.
    pub fn is_voxel_live(&self, x: usize, y: usize, z: usize) -> Result<bool, StorageError> {
        let slot = self.chunk_slot(x, y, z)?;
        Ok(!slot.is_empty() && self.voxel_is_live(slot, self.layout.voxel_in_slot(x, y, z)))
    }

    /// Live-voxel counter of a slot, or `None` if it was never allocated.
    pub fn slot_live_voxels(&self, slot: SlotIndex) -> Option<u32> {
        self.slab.live_voxels(slot)
    }

    /// Freed slots; the last one is handed out next.
    pub fn reusable_slots(&self) -> &[SlotIndex] {
        self.slab.reusable()
    }

    /// Slots ever allocated (live + reusable).
    pub fn allocated_slot_count(&self) -> usize {
        self.slab.slot_count()
    }

    /// Raw bytes of one attribute's buffer, for upload to another consumer.
    pub fn attribute_buffer(&self, attribute: AttributeId) -> Option<&[u8]> {
        self.buffers.get(attribute.index()).map(AttributeBuffer::as_bytes)
    }

    /// Raw chunk-grid cells, `u32::MAX` marking empty.
    pub fn chunk_grid(&self) -> &[u32] {
        self.grid.as_slice()
    }

    /// Chunk coordinates and slot of every allocated chunk, in cell order.
    pub fn populated_chunks(&self) -> impl Iterator<Item = ([usize; 3], SlotIndex)> + '_ {
        let layout = self.layout;
        self.grid
            .iter_allocated()
            .map(move |(cell, slot)| (layout.cell_coords(cell), slot))
    }

    /// Rebuild the reuse stack from the grid: every allocated slot that no
    /// cell references becomes reusable.
    pub fn rebuild_reuse_stack(&mut self) {
        self.slab.rebuild_free_list(&self.grid);
    }

    /// Occupancy and memory statistics.
    pub fn stats(&self) -> StorageStats {
        StorageStats {
            allocated_slots: self.slab.slot_count(),
            live_slots: self.slab.live_slot_count(),
            reusable_slots: self.slab.reusable().len(),
            live_voxels: self.slab.live_voxel_total(),
            grid_cells: self.grid.len(),
            memory_bytes: self.grid.memory_bytes()
                + self.buffers.iter().map(AttributeBuffer::memory_bytes).sum::<usize>(),
            reuse_hits: self.slab.reuse_hits(),
            reuse_misses: self.slab.reuse_misses(),
        }
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Write all components of one attribute at one voxel.
    ///
    /// `N` must equal the attribute's component count and `T` must match
    /// its declared type. While the schema has no attributes, a zero value
    /// is accepted as a no-op and anything else fails with
    /// [`StorageError::AllocationExhausted`].
    pub fn set_attribute_vector<T: Component, const N: usize>(
        &mut self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        value: [T; N],
    ) -> Result<(), StorageError> {
        if self.schema.is_empty() {
            return self.write_without_attributes(x, y, z, &value);
        }
        let schema = Arc::clone(&self.schema);
        let descriptor = self.check_access(&schema, attribute, x, y, z)?;
        check_component_count(attribute, descriptor, N)?;
        check_kind::<T>(attribute, descriptor)?;
        self.write_vector(attribute, descriptor, x, y, z, &value)
    }

    /// Write a vector without validation.
    ///
    /// The value is converted to the declared type whatever `T` is. If `N`
    /// exceeds the component count only the first components are written.
    ///
    /// # Panics
    ///
    /// May panic if the attribute or coordinates are out of range. Debug
    /// builds also panic if a needed slot cannot be allocated; release
    /// builds drop the write, leaving storage unchanged.
    pub fn set_attribute_vector_unchecked<T: Component, const N: usize>(
        &mut self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        value: [T; N],
    ) {
        let schema = Arc::clone(&self.schema);
        let descriptor = &schema.descriptors()[attribute.index()];
        let result = self.write_vector(attribute, descriptor, x, y, z, &value);
        debug_assert!(result.is_ok(), "unchecked voxel write dropped: {result:?}");
    }

    /// Write a single component of one attribute at one voxel.
    pub fn set_attribute_component<T: Component>(
        &mut self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
        value: T,
    ) -> Result<(), StorageError> {
        if self.schema.is_empty() {
            return self.write_without_attributes(x, y, z, &[value]);
        }
        let schema = Arc::clone(&self.schema);
        let descriptor = self.check_access(&schema, attribute, x, y, z)?;
        check_component_index(attribute, descriptor, component)?;
        check_kind::<T>(attribute, descriptor)?;
        self.write_component(attribute, descriptor, x, y, z, component, value.to_number())
    }

    /// Write a single component without validation.
    ///
    /// # Panics
    ///
    /// May panic if the attribute or coordinates are out of range. A
    /// component index past the attribute's count writes into the
    /// neighbouring voxel. Slot allocation failure is handled as in
    /// [`set_attribute_vector_unchecked`](Self::set_attribute_vector_unchecked).
    pub fn set_attribute_component_unchecked<T: Component>(
        &mut self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
        value: T,
    ) {
        let schema = Arc::clone(&self.schema);
        let descriptor = &schema.descriptors()[attribute.index()];
        let result =
            self.write_component(attribute, descriptor, x, y, z, component, value.to_number());
        debug_assert!(result.is_ok(), "unchecked voxel write dropped: {result:?}");
    }

    /// A checked write before any attribute exists: zero values are
    /// absorbed, anything else needs a slot that cannot be allocated.
    fn write_without_attributes<T: Component>(
        &self,
        x: usize,
        y: usize,
        z: usize,
        value: &[T],
    ) -> Result<(), StorageError> {
        self.check_bounds(x, y, z)?;
        if value.iter().all(|v| is_zero(v.to_number())) {
            return Ok(());
        }
        let e = StorageError::AllocationExhausted { attributes: 0 };
        log::error!("{e}");
        Err(e)
    }

    fn write_vector<T: Component>(
        &mut self,
        attribute: AttributeId,
        descriptor: &AttributeDescriptor,
        x: usize,
        y: usize,
        z: usize,
        value: &[T],
    ) -> Result<(), StorageError> {
        let count = value.len().min(descriptor.components());
        let numbers: SmallVec<[Number; 4]> =
            value[..count].iter().map(|v| v.to_number()).collect();
        let mut encoded: SmallVec<[u8; 32]> = smallvec![0; count * descriptor.component_size()];
        codec::encode_vector(&numbers, descriptor, &mut encoded);
        self.store(attribute, x, y, z, 0, &encoded)
    }

    #[allow(clippy::too_many_arguments)]
    fn write_component(
        &mut self,
        attribute: AttributeId,
        descriptor: &AttributeDescriptor,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
        value: Number,
    ) -> Result<(), StorageError> {
        let size = descriptor.component_size();
        let mut encoded: SmallVec<[u8; 8]> = smallvec![0; size];
        codec::encode_component(value, descriptor.attribute_type(), &mut encoded);
        self.store(attribute, x, y, z, component * size, &encoded)
    }

    /// Store encoded bytes at `offset_in_voxel` and keep slot accounting
    /// exact. On allocation failure the storage is unchanged.
    fn store(
        &mut self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        offset_in_voxel: usize,
        encoded: &[u8],
    ) -> Result<(), StorageError> {
        let zero_write = encoded.iter().all(|&b| b == 0);
        let cell = self.layout.chunk_cell(x, y, z);
        let mut slot = self.grid.get(cell);
        let fresh = slot.is_empty();
        if fresh {
            if zero_write {
                return Ok(());
            }
            slot = self
                .slab
                .next_slot(&mut self.buffers, self.layout.voxels_per_slot())?;
            self.grid.set(cell, slot);
        }

        let voxel = self.layout.voxel_in_slot(x, y, z);
        // New and reclaimed slots are all zero.
        let was_live = !fresh && self.voxel_is_live(slot, voxel);

        let buffer = &mut self.buffers[attribute.index()];
        let offset = self.layout.voxel_offset(slot, voxel, buffer.stride()) + offset_in_voxel;
        buffer
            .bytes_mut(offset, encoded.len())
            .copy_from_slice(encoded);

        let is_live = !zero_write || self.voxel_is_live(slot, voxel);
        match (was_live, is_live) {
            (false, true) => self.slab.mark_voxel_live(slot),
            (true, false) => {
                if self.slab.mark_voxel_dead(slot) {
                    self.slab.reclaim(slot, &mut self.grid, cell);
                }
            }
            _ => {}
        }
        Ok(())
    }

    // ── Reads ───────────────────────────────────────────────────

    /// Read all components of one attribute at one voxel.
    ///
    /// Voxels in unallocated chunks read as zero.
    pub fn get_attribute_vector<T: Component, const N: usize>(
        &self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
    ) -> Result<[T; N], StorageError> {
        let descriptor = self.check_access(&self.schema, attribute, x, y, z)?;
        check_component_count(attribute, descriptor, N)?;
        check_kind::<T>(attribute, descriptor)?;
        Ok(self.read_vector(attribute, descriptor, x, y, z))
    }

    /// Read a vector without validation. Components past the attribute's
    /// count read as zero.
    ///
    /// # Panics
    ///
    /// May panic if the attribute or coordinates are out of range.
    pub fn get_attribute_vector_unchecked<T: Component, const N: usize>(
        &self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
    ) -> [T; N] {
        let descriptor = &self.schema.descriptors()[attribute.index()];
        self.read_vector(attribute, descriptor, x, y, z)
    }

    /// Read a single component of one attribute at one voxel.
    pub fn get_attribute_component<T: Component>(
        &self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
    ) -> Result<T, StorageError> {
        let descriptor = self.check_access(&self.schema, attribute, x, y, z)?;
        check_component_index(attribute, descriptor, component)?;
        check_kind::<T>(attribute, descriptor)?;
        Ok(self.read_component(attribute, descriptor, x, y, z, component))
    }

    /// Read a single component without validation.
    ///
    /// # Panics
    ///
    /// May panic if the attribute or coordinates are out of range.
    pub fn get_attribute_component_unchecked<T: Component>(
        &self,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
    ) -> T {
        let descriptor = &self.schema.descriptors()[attribute.index()];
        self.read_component(attribute, descriptor, x, y, z, component)
    }

    fn read_vector<T: Component, const N: usize>(
        &self,
        attribute: AttributeId,
        descriptor: &AttributeDescriptor,
        x: usize,
        y: usize,
        z: usize,
    ) -> [T; N] {
        let mut out = [T::default(); N];
        let slot = self.grid.get(self.layout.chunk_cell(x, y, z));
        if slot.is_empty() {
            return out;
        }
        let buffer = &self.buffers[attribute.index()];
        let voxel = self.layout.voxel_in_slot(x, y, z);
        let offset = self.layout.voxel_offset(slot, voxel, buffer.stride());
        let bytes = buffer.bytes(offset, buffer.stride());
        for (dst, n) in out.iter_mut().zip(codec::decode_vector(descriptor, bytes, N)) {
            *dst = T::from_number(n);
        }
        out
    }

    fn read_component<T: Component>(
        &self,
        attribute: AttributeId,
        descriptor: &AttributeDescriptor,
        x: usize,
        y: usize,
        z: usize,
        component: usize,
    ) -> T {
        let slot = self.grid.get(self.layout.chunk_cell(x, y, z));
        if slot.is_empty() {
            return T::default();
        }
        let size = descriptor.component_size();
        let offset = self.layout.component_offset(
            slot,
            self.layout.voxel_in_slot(x, y, z),
            descriptor.components(),
            size,
            component,
        );
        let bytes = self.buffers[attribute.index()].bytes(offset, size);
        T::from_number(codec::decode_component(descriptor.attribute_type(), bytes))
    }

    // ── Validation and accounting helpers ───────────────────────

    fn check_bounds(&self, x: usize, y: usize, z: usize) -> Result<(), StorageError> {
        if self.layout.contains(x, y, z) {
            Ok(())
        } else {
            Err(StorageError::OutOfRange {
                x,
                y,
                z,
                width: self.layout.width(),
                height: self.layout.height(),
                depth: self.layout.depth(),
            })
        }
    }

    /// Attribute and coordinate validation shared by checked reads and writes.
    fn check_access<'s>(
        &self,
        schema: &'s AttributeSchema,
        attribute: AttributeId,
        x: usize,
        y: usize,
        z: usize,
    ) -> Result<&'s AttributeDescriptor, StorageError> {
        let descriptor = schema
            .get(attribute)
            .ok_or(StorageError::AttributeOutOfRange {
                attribute,
                count: schema.len(),
            })?;
        self.check_bounds(x, y, z)?;
        Ok(descriptor)
    }

    /// Whether any attribute byte of a voxel in an allocated slot is non-zero.
    fn voxel_is_live(&self, slot: SlotIndex, voxel: usize) -> bool {
        self.buffers
            .iter()
            .any(|b| !b.voxel_is_zero(self.layout.voxel_offset(slot, voxel, b.stride())))
    }
}

/// Whether a value encodes to all-zero bytes in its own kind.
fn is_zero(n: Number) -> bool {
    match n {
        Number::Signed(v) => v == 0,
        Number::Unsigned(v) => v == 0,
        Number::Float(v) => v.to_bits() == 0,
    }
}

fn check_kind<T: Component>(
    attribute: AttributeId,
    descriptor: &AttributeDescriptor,
) -> Result<(), StorageError> {
    if descriptor.attribute_type() == T::TYPE {
        return Ok(());
    }
    log::warn!(
        "attribute {attribute} ('{}') is {}, rejected {} access",
        descriptor.name(),
        descriptor.attribute_type(),
        T::TYPE
    );
    Err(StorageError::SchemaMismatch {
        attribute,
        expected: descriptor.attribute_type(),
        requested: T::TYPE,
    })
}

fn check_component_count(
    attribute: AttributeId,
    descriptor: &AttributeDescriptor,
    requested: usize,
) -> Result<(), StorageError> {
    if descriptor.components() == requested {
        Ok(())
    } else {
        Err(StorageError::ComponentCountMismatch {
            attribute,
            expected: descriptor.components(),
            requested,
        })
    }
}

fn check_component_index(
    attribute: AttributeId,
    descriptor: &AttributeDescriptor,
    component: usize,
) -> Result<(), StorageError> {
    if component < descriptor.components() {
        Ok(())
    } else {
        Err(StorageError::ComponentOutOfRange {
            attribute,
            component,
            count: descriptor.components(),
        })
    }
}
