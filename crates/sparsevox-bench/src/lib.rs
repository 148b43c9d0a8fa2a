//! Benchmark profiles for sparsevox storage.
//!
//! - [`reference_profile`]: 256³ requested extent, 32³ chunks, the
//!   defaults a fresh storage starts with.
//! - [`dense_profile`]: 64³ with 8³ chunks, many small slots.
//! - [`sparse_pattern`]: deterministic voxel coordinates at a given fill
//!   ratio.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use sparsevox_storage::VolumeConfig;

/// Volume config used by the headline benchmarks.
pub fn reference_profile() -> VolumeConfig {
    VolumeConfig::default()
}

/// Small chunks over a small volume; exercises slot allocation.
pub fn dense_profile() -> VolumeConfig {
    VolumeConfig::new(64, 64, 64, 8)
}

/// Every `stride`-th voxel along each axis of a cube of edge `extent`.
///
/// With `stride == chunk_size` this touches exactly one voxel per chunk,
/// the worst case for slot allocation.
pub fn sparse_pattern(extent: usize, stride: usize) -> Vec<[usize; 3]> {
    let stride = stride.max(1);
    let mut coords = Vec::new();
    for z in (0..extent).step_by(stride) {
        for y in (0..extent).step_by(stride) {
            for x in (0..extent).step_by(stride) {
                coords.push([x, y, z]);
            }
        }
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        reference_profile().validate().unwrap();
        dense_profile().validate().unwrap();
    }

    #[test]
    fn sparse_pattern_hits_one_voxel_per_chunk() {
        let coords = sparse_pattern(64, 8);
        assert_eq!(coords.len(), 8 * 8 * 8);
        assert!(coords.iter().all(|c| c.iter().all(|&v| v % 8 == 0 && v < 64)));
    }

    #[test]
    fn zero_stride_is_dense() {
        assert_eq!(sparse_pattern(4, 0).len(), 64);
    }
}
