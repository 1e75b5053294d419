//! Double-buffered field storage
//!
//! Every mutable field in the simulation lives behind a pair of buffers: one
//! holds the authoritative state (`current`) while the other serves as
//! scratch space for the in-flight kernel. A step swaps the roles first and
//! then writes `current` from `previous`, so no parallel pass ever reads a
//! value it is concurrently overwriting.

use crate::engine::array::VectorField;

/// Two field slots behind a front index.
#[derive(Debug, Clone)]
pub struct DoubleBuffer {
    slots: [VectorField; 2],
    front: usize,
}

impl DoubleBuffer {
    /// Allocate both slots zeroed at the given grid dimensions
    pub fn zeros(width: usize, height: usize) -> Self {
        Self {
            slots: [
                VectorField::zeros(width, height),
                VectorField::zeros(width, height),
            ],
            front: 0,
        }
    }

    /// Allocate both slots with every cell set to `sample`
    pub fn from_sample(width: usize, height: usize, sample: [f32; 3]) -> Self {
        Self {
            slots: [
                VectorField::from_sample(width, height, sample),
                VectorField::from_sample(width, height, sample),
            ],
            front: 0,
        }
    }

    /// The authoritative buffer
    #[inline]
    pub fn current(&self) -> &VectorField {
        &self.slots[self.front]
    }

    /// Mutable access to the authoritative buffer (for direct edits that
    /// bypass the swap discipline, e.g. installing a decoded material map)
    #[inline]
    pub fn current_mut(&mut self) -> &mut VectorField {
        &mut self.slots[self.front]
    }

    /// The scratch buffer / last consumed input
    #[inline]
    pub fn previous(&self) -> &VectorField {
        &self.slots[1 - self.front]
    }

    /// Exchange the roles of the two buffers
    #[inline]
    pub fn swap(&mut self) {
        self.front = 1 - self.front;
    }

    /// Borrow the read-set and write-set of one kernel pass at once:
    /// `(previous, current)`.
    #[inline]
    pub fn split_mut(&mut self) -> (&VectorField, &mut VectorField) {
        let (lo, hi) = self.slots.split_at_mut(1);
        if self.front == 0 {
            (&hi[0], &mut lo[0])
        } else {
            (&lo[0], &mut hi[0])
        }
    }

    /// Zero both slots in place
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.fill(0.0);
        }
    }

    /// Reallocate both slots at new dimensions, discarding all contents
    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::zeros(width, height);
    }
}
