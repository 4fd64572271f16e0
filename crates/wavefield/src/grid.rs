//! Lattice topology. Created once; never changes size or order.

pub const GRID_WIDTH: usize = 200;
pub const GRID_DEPTH: usize = 200;
pub const GRID_SPACING: f64 = 2.0;

/// Dimensions of the sample lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    /// Number of samples along X (index `i`).
    pub width: usize,
    /// Number of samples along Z (index `j`).
    pub depth: usize,
    /// World units between neighbouring samples.
    pub spacing: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::new(GRID_WIDTH, GRID_DEPTH, GRID_SPACING)
    }
}

/// One lattice sample with its indices and planar coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub i: usize,
    pub j: usize,
    pub x: f64,
    pub z: f64,
}

impl GridSpec {
    pub const fn new(width: usize, depth: usize, spacing: f64) -> Self {
        Self {
            width,
            depth,
            spacing,
        }
    }

    /// Number of points in the lattice.
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.depth
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// X coordinate of column `i`, centred on the origin.
    #[inline]
    pub fn x_at(&self, i: usize) -> f64 {
        (i as f64 - self.width as f64 / 2.0) * self.spacing
    }

    /// Z coordinate of row `j`, centred on the origin.
    #[inline]
    pub fn z_at(&self, j: usize) -> f64 {
        (j as f64 - self.depth as f64 / 2.0) * self.spacing
    }

    /// Point index of `(i, j)` in buffer order.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.depth + j
    }

    /// Walks every cell in buffer order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.width).flat_map(move |i| {
            (0..self.depth).map(move |j| Cell {
                i,
                j,
                x: self.x_at(i),
                z: self.z_at(j),
            })
        })
    }
}
