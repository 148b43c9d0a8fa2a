//! Volume configuration parameters.

use crate::error::StorageError;

/// How configured dimensions are rounded to a multiple of the chunk size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoundingRule {
    /// `d + (chunk - d % chunk)`.
    ///
    /// A dimension that is already an exact multiple is bumped to the next
    /// one (256 with chunk 32 becomes 288). Kept as the default so volumes
    /// keep the extents they had in existing content.
    #[default]
    NextMultiple,
    /// Round up to the nearest multiple; exact multiples are unchanged.
    AlignUp,
}

impl RoundingRule {
    /// Round `dimension` according to this rule.
    ///
    /// `chunk_size` must be non-zero.
    pub fn apply(self, dimension: usize, chunk_size: usize) -> Option<usize> {
        match self {
            Self::NextMultiple => dimension.checked_add(chunk_size - dimension % chunk_size),
            Self::AlignUp => dimension.checked_next_multiple_of(chunk_size),
        }
    }
}

/// Requested volume extents and chunk size.
///
/// Dimensions are in voxels and are rounded by [`RoundingRule`] when the
/// storage is configured; the storage reports the rounded values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VolumeConfig {
    /// Requested extent along x.
    pub width: usize,
    /// Requested extent along y.
    pub height: usize,
    /// Requested extent along z.
    pub depth: usize,
    /// Edge length of a cubic chunk. Must be non-zero.
    pub chunk_size: usize,
    /// Dimension rounding rule.
    pub rounding: RoundingRule,
}

impl VolumeConfig {
    /// Default chunk edge length.
    pub const DEFAULT_CHUNK_SIZE: usize = 32;

    /// Default extent along every axis.
    pub const DEFAULT_EXTENT: usize = 256;

    /// A config with the given extents and chunk size and the default rounding.
    pub fn new(width: usize, height: usize, depth: usize, chunk_size: usize) -> Self {
        Self {
            width,
            height,
            depth,
            chunk_size,
            rounding: RoundingRule::default(),
        }
    }

    /// Use a different rounding rule.
    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.rounding = rounding;
        self
    }

    /// Check that the config can be laid out.
    pub fn validate(&self) -> Result<(), StorageError> {
        self.rounded_extents().map(|_| ())
    }

    /// Extents after rounding, as `[width, height, depth]`.
    pub fn rounded_extents(&self) -> Result<[usize; 3], StorageError> {
        if self.chunk_size == 0 {
            return Err(StorageError::InvalidConfig {
                reason: "chunk_size must be non-zero".to_string(),
            });
        }
        let mut out = [0usize; 3];
        for (slot, dim) in out.iter_mut().zip([self.width, self.height, self.depth]) {
            *slot = self
                .rounding
                .apply(dim, self.chunk_size)
                .ok_or_else(|| StorageError::InvalidConfig {
                    reason: format!(
                        "dimension {dim} overflows when rounded to chunk size {}",
                        self.chunk_size
                    ),
                })?;
        }
        Ok(out)
    }
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_EXTENT,
            Self::DEFAULT_EXTENT,
            Self::DEFAULT_EXTENT,
            Self::DEFAULT_CHUNK_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_multiple_rounds_partial_chunk() {
        assert_eq!(RoundingRule::NextMultiple.apply(100, 32), Some(128));
    }

    #[test]
    fn next_multiple_bumps_exact_multiple() {
        assert_eq!(RoundingRule::NextMultiple.apply(256, 32), Some(288));
        assert_eq!(RoundingRule::NextMultiple.apply(0, 16), Some(16));
    }

    #[test]
    fn align_up_keeps_exact_multiple() {
        assert_eq!(RoundingRule::AlignUp.apply(256, 32), Some(256));
        assert_eq!(RoundingRule::AlignUp.apply(100, 32), Some(128));
        assert_eq!(RoundingRule::AlignUp.apply(0, 16), Some(0));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let config = VolumeConfig::new(64, 64, 64, 0);
        assert!(matches!(
            config.validate(),
            Err(StorageError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn overflow_rejected() {
        let config = VolumeConfig::new(usize::MAX, 1, 1, 32);
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_matches_documented_extents() {
        let config = VolumeConfig::default();
        assert_eq!(config.chunk_size, 32);
        assert_eq!(config.rounded_extents().unwrap(), [288, 288, 288]);
    }
}
