//! Per-attribute contiguous byte buffers.
//!
//! An [`AttributeBuffer`] holds every allocated chunk slot for one attribute,
//! concatenated in slot order. It grows by exactly one zero-filled slot at a
//! time and never shrinks; freed slots keep their bytes and are reused in
//! place.

use std::collections::TryReserveError;

/// Backing storage for one attribute.
#[derive(Clone, Debug)]
pub struct AttributeBuffer {
    /// Slot bytes, slot `n` at `n * slot_bytes`.
    data: Vec<u8>,
    /// Bytes per voxel for this attribute.
    stride: usize,
}

impl AttributeBuffer {
    /// An empty buffer for an attribute with the given per-voxel stride.
    pub fn new(stride: usize) -> Self {
        Self {
            data: Vec::new(),
            stride,
        }
    }

    /// Bytes per voxel.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Make room for one more slot without growing the length.
    ///
    /// Lets the slab reserve in every buffer before growing any of them,
    /// so a failed allocation leaves all buffers in lockstep.
    pub fn reserve_one_slot(&mut self, voxels_per_slot: usize) -> Result<(), TryReserveError> {
        self.data.try_reserve_exact(voxels_per_slot * self.stride)
    }

    /// Append one zero-filled slot of `voxels_per_slot` voxels.
    ///
    /// Returns the byte offset at which the new slot starts.
    pub fn grow_one_slot(&mut self, voxels_per_slot: usize) -> usize {
        let start = self.data.len();
        self.data.resize(start + voxels_per_slot * self.stride, 0);
        start
    }

    /// Number of whole slots held.
    pub fn slot_count(&self, voxels_per_slot: usize) -> usize {
        let slot_bytes = voxels_per_slot * self.stride;
        if slot_bytes == 0 {
            0
        } else {
            self.data.len() / slot_bytes
        }
    }

    /// Shared view of `len` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the buffer.
    #[inline]
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Mutable view of `len` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the range exceeds the buffer.
    #[inline]
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }

    /// Whether the `stride` bytes of a voxel at `offset` are all zero.
    #[inline]
    pub fn voxel_is_zero(&self, offset: usize) -> bool {
        self.bytes(offset, self.stride).iter().all(|&b| b == 0)
    }

    /// The whole buffer, for upload or inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether no slots have been allocated.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Memory usage of the backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.data.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grow_appends_zeroed_slot() {
        let mut buf = AttributeBuffer::new(4);
        assert_eq!(buf.grow_one_slot(8), 0);
        assert_eq!(buf.len(), 32);
        assert_eq!(buf.grow_one_slot(8), 32);
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.slot_count(8), 2);
    }

    #[test]
    fn reserve_does_not_change_length() {
        let mut buf = AttributeBuffer::new(4);
        buf.reserve_one_slot(8).unwrap();
        assert!(buf.is_empty());
        assert!(buf.memory_bytes() >= 32);
    }

    #[test]
    fn voxel_zero_check_covers_stride() {
        let mut buf = AttributeBuffer::new(3);
        buf.grow_one_slot(2);
        assert!(buf.voxel_is_zero(3));
        buf.bytes_mut(5, 1)[0] = 9;
        assert!(!buf.voxel_is_zero(3));
        assert!(buf.voxel_is_zero(0));
    }

    #[test]
    fn bytes_roundtrip() {
        let mut buf = AttributeBuffer::new(2);
        buf.grow_one_slot(4);
        buf.bytes_mut(2, 2).copy_from_slice(&[0xAB, 0xCD]);
        assert_eq!(buf.bytes(2, 2), &[0xAB, 0xCD]);
    }

    #[test]
    #[should_panic]
    fn bytes_past_end_panics() {
        let buf = AttributeBuffer::new(2);
        let _ = buf.bytes(0, 1);
    }
}
