//! Core array type for 2D field simulations
//!
//! This module provides the fundamental array type used throughout the
//! library: a 2D grid with one 3-component sample per cell, wrapping ndarray
//! for efficient numerical operations.

use ndarray::{Array3, ArrayView3, ArrayViewMut3, Axis};
use num_traits::Zero;

/// Channel indices for vector-valued fields (Ex/Ey/Ez, Hx/Hy/Hz).
pub const CH_X: usize = 0;
pub const CH_Y: usize = 1;
pub const CH_Z: usize = 2;

/// Number of components per cell.
pub const CHANNELS: usize = 3;

/// A 2D grid of 3-component samples, stored as `(width, height, 3)`.
///
/// All out-of-bounds reads yield zero; this is the bounds convention used by
/// every stencil in the solver rather than panics or wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorField<T = f32> {
    /// The underlying ndarray
    pub data: Array3<T>,
}

impl<T> VectorField<T>
where
    T: Clone + Zero,
{
    /// Create a new field of zeros with the given grid dimensions
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            data: Array3::zeros((width, height, CHANNELS)),
        }
    }

    /// Create a new field with every cell set to the same sample
    pub fn from_sample(width: usize, height: usize, sample: [T; CHANNELS]) -> Self {
        let mut data = Array3::zeros((width, height, CHANNELS));
        for mut cell in data.rows_mut() {
            for (c, v) in cell.iter_mut().zip(sample.iter()) {
                *c = v.clone();
            }
        }
        Self { data }
    }

    /// Grid width in cells
    pub fn width(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Grid height in cells
    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.width() * self.height()
    }

    /// Check if the grid is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get a view of the field
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Get a mutable view of the field
    pub fn view_mut(&mut self) -> ArrayViewMut3<'_, T> {
        self.data.view_mut()
    }
}

impl VectorField<f32> {
    /// Read one component, treating any index outside the grid as zero.
    #[inline]
    pub fn get(&self, x: isize, y: isize, channel: usize) -> f32 {
        if x < 0 || y < 0 {
            return 0.0;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.width() || y >= self.height() {
            return 0.0;
        }
        self.data[[x, y, channel]]
    }

    /// Read a whole cell, zero outside the grid.
    #[inline]
    pub fn get_cell(&self, x: isize, y: isize) -> [f32; CHANNELS] {
        [
            self.get(x, y, CH_X),
            self.get(x, y, CH_Y),
            self.get(x, y, CH_Z),
        ]
    }

    /// Overwrite one cell. Panics on out-of-bounds; writes are always
    /// produced by kernels iterating the grid proper.
    #[inline]
    pub fn set_cell(&mut self, x: usize, y: usize, sample: [f32; CHANNELS]) {
        for (c, v) in sample.iter().enumerate() {
            self.data[[x, y, c]] = *v;
        }
    }

    /// Fill every component of every cell with a scalar value
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Sum of squared components over the whole grid.
    ///
    /// For an electric or magnetic field this is the (unnormalized) field
    /// energy measure used by the diagnostics and tests.
    pub fn norm_squared(&self) -> f64 {
        self.data.iter().map(|&v| (v as f64) * (v as f64)).sum()
    }
}
