//! Grid geometry: block spacing and 2D grid dimensions.
//!
//! The volume is partitioned into (x, y) columns of infinite depth; Z is not
//! binned. The spacing is the edge of a cube holding one block's worth of
//! ions on average.

use crate::errors::{CoocError, Result};
use crate::types::Extents;
use serde::{Deserialize, Serialize};

/// Spatial partition parameters derived before the accumulation pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridGeometry {
    /// Column edge length (nm)
    pub spacing: f32,
    /// Grid columns along X
    pub nx: usize,
    /// Grid columns along Y
    pub ny: usize,
    /// Minimum corner of the extents (nm), the grid origin
    pub origin: [f32; 3],
}

impl GridGeometry {
    /// Derive spacing and grid dimensions.
    ///
    /// `spacing = cbrt(volume * block_size / total_ranged)` — the edge of a
    /// cube whose volume is the average volume per block.
    pub fn compute(extents: &Extents, block_size: u32, total_ranged: u64) -> Result<Self> {
        if total_ranged == 0 {
            return Err(CoocError::geometry(
                "dataset contains no ranged ions; spacing is undefined",
            ));
        }
        let volume = extents.volume();
        if !(volume > 0.0) {
            return Err(CoocError::geometry(format!(
                "extents volume {} is not positive",
                volume
            )));
        }

        let spacing = (volume * block_size as f32 / total_ranged as f32).cbrt();
        let diff = extents.diff();
        let nx = (diff[0] / spacing).floor() as usize + 1;
        let ny = (diff[1] / spacing).floor() as usize + 1;

        Ok(Self {
            spacing,
            nx,
            ny,
            origin: extents.min,
        })
    }

    /// Total grid columns
    pub fn num_columns(&self) -> usize {
        self.nx * self.ny
    }

    /// Column coordinates for a position.
    ///
    /// Positions are expected inside the extents; coordinates are clamped to
    /// the grid so a record exactly at `max` (or float noise past it) lands
    /// in the last column instead of out of bounds.
    #[inline]
    pub fn column_of(&self, pos: &[f32; 3]) -> (usize, usize) {
        let gx = ((pos[0] - self.origin[0]) / self.spacing).floor();
        let gy = ((pos[1] - self.origin[1]) / self.spacing).floor();
        let gx = (gx.max(0.0) as usize).min(self.nx - 1);
        let gy = (gy.max(0.0) as usize).min(self.ny - 1);
        (gx, gy)
    }

    /// Flat index of a column
    #[inline]
    pub fn column_index(&self, gx: usize, gy: usize) -> usize {
        gy * self.nx + gx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spacing_is_cube_root_of_volume_per_block() {
        // 1000 nm³, 1000 ions, block of 100 -> 100 nm³ per block -> edge ~4.6416
        let extents = Extents::new([0.0; 3], [10.0; 3]);
        let geom = GridGeometry::compute(&extents, 100, 1000).unwrap();
        assert!((geom.spacing - 100.0f32.cbrt()).abs() < 1e-5);
        assert_eq!(geom.nx, (10.0 / geom.spacing).floor() as usize + 1);
        assert_eq!(geom.ny, geom.nx);
    }

    #[test]
    fn test_zero_ranged_ions_fails_fast() {
        let extents = Extents::new([0.0; 3], [10.0; 3]);
        let err = GridGeometry::compute(&extents, 100, 0);
        assert!(matches!(err, Err(CoocError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_collapsed_extents_fail_fast() {
        let extents = Extents::new([0.0; 3], [10.0, 10.0, 0.0]);
        let err = GridGeometry::compute(&extents, 100, 1000);
        assert!(matches!(err, Err(CoocError::DegenerateGeometry(_))));
    }

    #[test]
    fn test_column_clamping_at_max_corner() {
        let extents = Extents::new([0.0; 3], [10.0; 3]);
        let geom = GridGeometry::compute(&extents, 100, 1000).unwrap();

        let (gx, gy) = geom.column_of(&[10.0, 10.0, 5.0]);
        assert!(gx < geom.nx);
        assert!(gy < geom.ny);

        let (gx, gy) = geom.column_of(&[0.0, 0.0, 0.0]);
        assert_eq!((gx, gy), (0, 0));
    }
}
