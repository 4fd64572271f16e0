//! Vertex and colour buffers for the animated lattice.

use crate::{
    color::grayscale,
    grid::GridSpec,
    height::{animated_height, initial_height},
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Point positions and colours in buffer order.
///
/// Both buffers are sized once in [`PointCloud::new`]; afterwards only the
/// `y` component of each position is written.
#[derive(Debug, Clone)]
pub struct PointCloud {
    grid: GridSpec,
    positions: Vec<f32>,
    colors: Vec<f32>,
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::new(GridSpec::default())
    }
}

impl PointCloud {
    /// Builds the lattice with its creation-time heights and colours.
    pub fn new(grid: GridSpec) -> Self {
        let mut positions = Vec::with_capacity(grid.len() * 3);
        let mut colors = Vec::with_capacity(grid.len() * 3);

        for cell in grid.cells() {
            let y = initial_height(&cell);
            positions.extend_from_slice(&[cell.x as f32, y as f32, cell.z as f32]);

            let g = grayscale(cell.x, cell.z, grid.width) as f32;
            colors.extend_from_slice(&[g, g, g]);
        }

        Self {
            grid,
            positions,
            colors,
        }
    }

    #[inline]
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Flat `[x, y, z, ...]` positions.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Flat `[r, g, b, ...]` colours.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Rewrites every height for animation time `time`.
    pub fn animate(&mut self, time: f64) {
        #[cfg(feature = "parallel")]
        let points = self.positions.par_chunks_exact_mut(3);
        #[cfg(not(feature = "parallel"))]
        let points = self.positions.chunks_exact_mut(3);

        points.for_each(|p| {
            let (x, z) = (p[0] as f64, p[2] as f64);
            p[1] = animated_height(x, z, time) as f32;
        });
    }

    /// Lowest and highest `y` currently in the buffer.
    pub fn height_range(&self) -> (f32, f32) {
        self.positions
            .chunks_exact(3)
            .map(|p| p[1])
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), y| {
                (lo.min(y), hi.max(y))
            })
    }
}
