//! Brush engine: rasterizes shapes onto a field or material channel
//!
//! One primitive serves material painting, point-source splatting and any
//! future paintable channel. The brush honors the same swap discipline as
//! the stepper: it swaps the target, copies the previous buffer through and
//! blends the shape into the new current buffer.

use crate::engine::buffer::DoubleBuffer;

/// Shapes the brush can rasterize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushShape {
    /// Inclusion by Chebyshev distance < size (size is the half-extent)
    Square,
    /// Inclusion by normalized Euclidean distance² ≤ 1 (size is the radius)
    Ellipse,
}

/// Paintable targets owned by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawTarget {
    /// The (ε, µ, σ) material map
    Material,
    /// The electric source accumulator
    Signal,
}

/// A configured brush stroke.
#[derive(Debug, Clone, Copy)]
pub struct Brush {
    pub shape: BrushShape,
    /// Half-extent (square) or radius (ellipse) in grid-relative units
    pub size: f32,
    /// Sample written into included cells
    pub value: [f32; 3],
    /// Fraction of the old value retained inside the shape: 0 overwrites,
    /// 1 adds
    pub keep: f32,
}

impl Brush {
    /// Rasterize the stroke onto `buffer` around `center` (grid-relative
    /// units). The center is snapped to the nearest cell before inclusion
    /// testing.
    pub fn apply(&self, buffer: &mut DoubleBuffer, center: [f32; 2], cell_size: f32) {
        buffer.swap();
        let (prev, cur) = buffer.split_mut();
        cur.data.assign(&prev.data);

        let center = [
            snap_to_cell(center[0], cell_size),
            snap_to_cell(center[1], cell_size),
        ];

        let (width, height) = (cur.width(), cur.height());
        for x in 0..width {
            for y in 0..height {
                let dx = x as f32 * cell_size - center[0];
                let dy = y as f32 * cell_size - center[1];
                if !self.contains(dx, dy, cell_size) {
                    continue;
                }
                let old = prev.get_cell(x as isize, y as isize);
                cur.set_cell(
                    x,
                    y,
                    [
                        self.value[0] + self.keep * old[0],
                        self.value[1] + self.keep * old[1],
                        self.value[2] + self.keep * old[2],
                    ],
                );
            }
        }
    }

    /// Inclusion test for a cell at offset (dx, dy) from the snapped center
    fn contains(&self, dx: f32, dy: f32, cell_size: f32) -> bool {
        match self.shape {
            BrushShape::Square => dx.abs().max(dy.abs()) < self.size,
            BrushShape::Ellipse => {
                let normalized = (dx * dx + dy * dy) / (self.size * self.size);
                // Sub-cell radii lose too much precision for the exact test
                let threshold = if self.size < cell_size { 2.0 } else { 1.0 };
                normalized <= threshold
            }
        }
    }
}

/// Snap a coordinate to the nearest grid-cell center: subtract the residual
/// modulo `cell_size`, rounding up when the residual exceeds half a cell.
pub fn snap_to_cell(coordinate: f32, cell_size: f32) -> f32 {
    let residual = coordinate.rem_euclid(cell_size);
    let snapped = coordinate - residual;
    if residual > cell_size / 2.0 {
        snapped + cell_size
    } else {
        snapped
    }
}
