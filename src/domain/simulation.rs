//! The FDTD field-update engine
//!
//! `Simulation` owns the grid, the double-buffered E/H/source/material
//! fields, the coefficient cache and the source descriptors, and exposes the
//! two leapfrog half-steps plus every configuration mutator. The rendering
//! collaborator only ever reads the `current` buffers through the accessor
//! methods; it never mutates solver state.
//!
//! Cell updates inside one kernel are data-parallel (dispatched through
//! rayon over grid rows); the sub-steps of a half-step run in strict
//! sequence because each consumes the output of the one before it.

use ndarray::parallel::prelude::*;
use ndarray::Axis;

use crate::domain::draw::{Brush, BrushShape, DrawTarget};
use crate::domain::material::{CoefficientCache, Material, UpdateCoefficients};
use crate::domain::source::SourceDescriptor;
use crate::engine::array::{VectorField, CH_X, CH_Y, CH_Z};
use crate::engine::buffer::DoubleBuffer;
use crate::utilities::encoding::MaterialMap;
use crate::Error;

/// Width of the open-boundary mirror frame, in cells.
const BOUNDARY_FRAME: usize = 2;

/// Per-unit-time decay base of the source accumulator.
const SOURCE_DECAY_BASE: f32 = 0.1;

/// Initial configuration of a simulation session.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Grid width in cells
    pub width: usize,
    /// Grid height in cells
    pub height: usize,
    /// Physical length per cell
    pub cell_size: f32,
    /// Reflective (closed) vs extrapolating (open) boundary
    pub reflective_boundary: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            cell_size: 0.02,
            reflective_boundary: false,
        }
    }
}

/// One 2D FDTD simulation session.
///
/// All fields are allocated together at construction and reallocated
/// together on resize; there is no partial lifecycle.
#[derive(Debug, Clone)]
pub struct Simulation {
    width: usize,
    height: usize,
    cell_size: f32,
    reflective_boundary: bool,
    /// Simulation time; advances by dt/2 per half-step
    time: f32,

    electric: DoubleBuffer,
    magnetic: DoubleBuffer,
    source: DoubleBuffer,
    material: DoubleBuffer,

    coefficients: CoefficientCache,
    sources: Vec<SourceDescriptor>,
}

impl Simulation {
    /// Create a session. Rejects non-positive dimensions or cell size.
    pub fn new(config: SimulationConfig) -> Result<Self, Error> {
        if config.width == 0 || config.height == 0 {
            return Err(Error::InvalidGrid {
                width: config.width,
                height: config.height,
            });
        }
        if config.cell_size <= 0.0 {
            return Err(Error::InvalidCellSize(config.cell_size));
        }

        let (width, height) = (config.width, config.height);
        Ok(Self {
            width,
            height,
            cell_size: config.cell_size,
            reflective_boundary: config.reflective_boundary,
            time: 0.0,
            electric: DoubleBuffer::zeros(width, height),
            magnetic: DoubleBuffer::zeros(width, height),
            source: DoubleBuffer::zeros(width, height),
            material: DoubleBuffer::from_sample(width, height, Material::vacuum().as_sample()),
            coefficients: CoefficientCache::new(width, height),
            sources: Vec::new(),
        })
    }

    // --- read access for the rendering/UI collaborators ---

    /// Grid dimensions in cells
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn reflective_boundary(&self) -> bool {
        self.reflective_boundary
    }

    /// Current simulation time
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Authoritative electric field
    pub fn electric_field(&self) -> &VectorField {
        self.electric.current()
    }

    /// Authoritative magnetic field
    pub fn magnetic_field(&self) -> &VectorField {
        self.magnetic.current()
    }

    /// Authoritative source accumulator
    pub fn source_field(&self) -> &VectorField {
        self.source.current()
    }

    /// Authoritative material map
    pub fn material(&self) -> &VectorField {
        self.material.current()
    }

    /// Number of coefficient recomputations so far (stable across steps
    /// with an unchanged material and time step)
    pub fn coefficient_generation(&self) -> u64 {
        self.coefficients.generation()
    }

    // --- configuration mutators ---

    /// Resize the grid. Field contents are not resampled across a
    /// resolution change: E/H/S are cleared and time restarts at zero.
    /// Material is preserved where the old and new grids overlap; cells
    /// outside the overlap get vacuum.
    pub fn set_grid_size(&mut self, width: usize, height: usize) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGrid { width, height });
        }

        let preserved = self.material.current().clone();
        self.reallocate(width, height);

        let kept_w = preserved.width().min(width);
        let kept_h = preserved.height().min(height);
        let material = self.material.current_mut();
        for x in 0..kept_w {
            for y in 0..kept_h {
                material.set_cell(x, y, preserved.get_cell(x as isize, y as isize));
            }
        }
        Ok(())
    }

    /// Change the physical length per cell. Stored field values are
    /// meaningless at the new resolution, so the fields reset.
    pub fn set_cell_size(&mut self, cell_size: f32) -> Result<(), Error> {
        if cell_size <= 0.0 {
            return Err(Error::InvalidCellSize(cell_size));
        }
        self.cell_size = cell_size;
        self.reset_fields();
        self.coefficients.mark_dirty();
        Ok(())
    }

    /// Switch the boundary mode; takes effect on the next step.
    pub fn set_reflective_boundary(&mut self, reflective: bool) {
        self.reflective_boundary = reflective;
        self.coefficients.mark_dirty();
    }

    /// Zero all E/H/S samples and restart simulation time.
    pub fn reset_fields(&mut self) {
        self.electric.clear();
        self.magnetic.clear();
        self.source.clear();
        self.time = 0.0;
    }

    /// Reset the material map to vacuum everywhere.
    pub fn reset_material(&mut self) {
        let sample = Material::vacuum().as_sample();
        self.material = DoubleBuffer::from_sample(self.width, self.height, sample);
        self.coefficients.mark_dirty();
    }

    fn reallocate(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.electric.resize(width, height);
        self.magnetic.resize(width, height);
        self.source.resize(width, height);
        self.material =
            DoubleBuffer::from_sample(width, height, Material::vacuum().as_sample());
        self.coefficients.resize(width, height);
        self.time = 0.0;
    }

    // --- material load/save ---

    /// Install a decoded material map. A map with different dimensions
    /// resizes the grid through the ordinary reallocation path.
    pub fn load_material(&mut self, map: MaterialMap) {
        if (map.width, map.height) != (self.width, self.height) {
            self.reallocate(map.width, map.height);
        }
        self.material.current_mut().data.assign(&map.cells.data);
        self.coefficients.mark_dirty();
    }

    /// Snapshot the current material map for serialization.
    pub fn save_material(&self) -> MaterialMap {
        MaterialMap {
            width: self.width,
            height: self.height,
            cells: self.material.current().clone(),
        }
    }

    // --- sources ---

    pub fn add_source(&mut self, source: SourceDescriptor) {
        self.sources.push(source);
    }

    pub fn remove_source(&mut self, index: usize) -> Option<SourceDescriptor> {
        if index < self.sources.len() {
            Some(self.sources.remove(index))
        } else {
            None
        }
    }

    pub fn clear_sources(&mut self) {
        self.sources.clear();
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    // --- brush ---

    /// Rasterize a brush stroke onto one of the paintable targets.
    pub fn draw(&mut self, target: DrawTarget, brush: &Brush, center: [f32; 2]) {
        match target {
            DrawTarget::Material => {
                brush.apply(&mut self.material, center, self.cell_size);
                self.coefficients.mark_dirty();
            }
            DrawTarget::Signal => {
                brush.apply(&mut self.source, center, self.cell_size);
            }
        }
    }

    /// Paint a material value with a hard-overwrite brush.
    pub fn paint_material(
        &mut self,
        shape: BrushShape,
        center: [f32; 2],
        size: f32,
        material: Material,
    ) {
        let brush = Brush {
            shape,
            size,
            value: material.as_sample(),
            keep: 0.0,
        };
        self.draw(DrawTarget::Material, &brush, center);
    }

    /// Rewrite the electric field cell-by-cell between steps, under the
    /// usual swap discipline. The closure receives cell coordinates and the
    /// old sample and returns the new one.
    pub fn edit_electric_field<F>(&mut self, edit: F)
    where
        F: Fn(usize, usize, [f32; 3]) -> [f32; 3],
    {
        self.electric.swap();
        let (prev, cur) = self.electric.split_mut();
        for x in 0..cur.width() {
            for y in 0..cur.height() {
                let old = prev.get_cell(x as isize, y as isize);
                cur.set_cell(x, y, edit(x, y, old));
            }
        }
    }

    // --- stepper ---

    /// One full leapfrog cycle: magnetic then electric half-step.
    /// Advances simulation time by exactly `dt`.
    pub fn step(&mut self, dt: f32) {
        self.step_magnetic(dt);
        self.step_electric(dt);
    }

    /// Electric half-step. Injects the accumulated forcing, decays the
    /// accumulator, then applies the lossy curl update reading the current
    /// magnetic field. Advances time by dt/2.
    pub fn step_electric(&mut self, dt: f32) {
        self.inject_sources();
        self.coefficients
            .ensure(self.material.current(), dt, self.cell_size);

        // Swap E and S so both kernels read last step's authoritative state
        self.electric.swap();
        self.source.swap();

        // Inject: E = E_prev + S_prev * dt
        {
            let forcing = self.source.previous();
            let (prev, cur) = self.electric.split_mut();
            cur.data
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(x, mut slab)| {
                    for y in 0..slab.len_of(Axis(0)) {
                        for c in 0..3 {
                            slab[[y, c]] =
                                prev.data[[x, y, c]] + forcing.data[[x, y, c]] * dt;
                        }
                    }
                });
        }

        // Make the injected field the input of the curl update
        self.electric.swap();

        // Decay the forcing accumulator: S = S_prev * 0.1^dt
        {
            let decay = SOURCE_DECAY_BASE.powf(dt);
            let (prev, cur) = self.source.split_mut();
            cur.data
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(x, mut slab)| {
                    for y in 0..slab.len_of(Axis(0)) {
                        for c in 0..3 {
                            slab[[y, c]] = prev.data[[x, y, c]] * decay;
                        }
                    }
                });
        }

        // Curl update
        {
            let coeffs = self.coefficients.cached();
            let magnetic = self.magnetic.current();
            let reflective = self.reflective_boundary;
            let (width, height) = (self.width, self.height);
            let (prev, cur) = self.electric.split_mut();

            cur.data
                .axis_iter_mut(Axis(0))
                .into_par_iter()
                .enumerate()
                .for_each(|(x, mut slab)| {
                    for y in 0..height {
                        if let Some((mx, my)) = mirror_cell(x, y, width, height, reflective) {
                            for c in 0..3 {
                                slab[[y, c]] = prev.get(mx, my, c);
                            }
                            continue;
                        }
                        electric_curl_cell(x, y, prev, magnetic, coeffs, &mut slab);
                    }
                });
        }

        self.time += dt / 2.0;
    }

    /// Magnetic half-step: lossy curl update reading the current electric
    /// field. Advances time by dt/2.
    pub fn step_magnetic(&mut self, dt: f32) {
        self.coefficients
            .ensure(self.material.current(), dt, self.cell_size);

        self.magnetic.swap();

        let coeffs = self.coefficients.cached();
        let electric = self.electric.current();
        let reflective = self.reflective_boundary;
        let (width, height) = (self.width, self.height);
        let (prev, cur) = self.magnetic.split_mut();

        cur.data
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(x, mut slab)| {
                for y in 0..height {
                    if let Some((mx, my)) = mirror_cell(x, y, width, height, reflective) {
                        for c in 0..3 {
                            slab[[y, c]] = prev.get(mx, my, c);
                        }
                        continue;
                    }
                    magnetic_curl_cell(x, y, prev, electric, coeffs, &mut slab);
                }
            });

        self.time += dt / 2.0;
    }

    /// Splat every active source descriptor into the accumulator, reusing
    /// the brush with a half-cell square footprint.
    fn inject_sources(&mut self) {
        if self.sources.is_empty() {
            return;
        }
        let t = self.time;
        let splats: Vec<([f32; 2], f32)> = self
            .sources
            .iter()
            .filter_map(|s| s.value_at(t).map(|v| (s.position(), v)))
            .collect();

        for (position, value) in splats {
            let brush = Brush {
                shape: BrushShape::Square,
                size: self.cell_size * 0.5,
                value: [0.0, 0.0, value],
                keep: 0.0,
            };
            brush.apply(&mut self.source, position, self.cell_size);
        }
    }
}

/// Open-boundary override: cells within the mirror frame copy the previous
/// value at the index reflected inward across the frame. Returns `None`
/// for interior cells or when the boundary is reflective.
#[inline]
fn mirror_cell(
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    reflective: bool,
) -> Option<(isize, isize)> {
    if reflective {
        return None;
    }
    let mx = mirror_axis(x, width);
    let my = mirror_axis(y, height);
    if mx == x as isize && my == y as isize {
        None
    } else {
        Some((mx, my))
    }
}

#[inline]
fn mirror_axis(i: usize, len: usize) -> isize {
    let i = i as isize;
    let len = len as isize;
    if i < BOUNDARY_FRAME as isize {
        2 * BOUNDARY_FRAME as isize - i
    } else if i >= len - BOUNDARY_FRAME as isize {
        2 * (len - 1 - BOUNDARY_FRAME as isize) - i
    } else {
        i
    }
}

/// 2D reduction of the electric curl update: z-derivatives vanish since
/// the simulated domain has unit depth.
#[inline]
fn electric_curl_cell(
    x: usize,
    y: usize,
    prev: &VectorField,
    h: &VectorField,
    coeffs: &UpdateCoefficients,
    slab: &mut ndarray::ArrayViewMut2<'_, f32>,
) {
    let alpha = coeffs.alpha_e[[x, y]];
    let beta = coeffs.beta_e[[x, y]];
    let (xi, yi) = (x as isize, y as isize);

    let hz = h.get(xi, yi, CH_Z);
    let curl_x = hz - h.get(xi, yi - 1, CH_Z);
    let curl_y = hz - h.get(xi - 1, yi, CH_Z);
    let curl_z = (h.get(xi, yi, CH_Y) - h.get(xi - 1, yi, CH_Y))
        - (h.get(xi, yi, CH_X) - h.get(xi, yi - 1, CH_X));

    slab[[y, CH_X]] = alpha * prev.data[[x, y, CH_X]] + beta * curl_x;
    slab[[y, CH_Y]] = alpha * prev.data[[x, y, CH_Y]] - beta * curl_y;
    slab[[y, CH_Z]] = alpha * prev.data[[x, y, CH_Z]] + beta * curl_z;
}

/// Magnetic counterpart of [`electric_curl_cell`], reading forward
/// neighbors per the staggered half-cell offset.
#[inline]
fn magnetic_curl_cell(
    x: usize,
    y: usize,
    prev: &VectorField,
    e: &VectorField,
    coeffs: &UpdateCoefficients,
    slab: &mut ndarray::ArrayViewMut2<'_, f32>,
) {
    let alpha = coeffs.alpha_h[[x, y]];
    let beta = coeffs.beta_h[[x, y]];
    let (xi, yi) = (x as isize, y as isize);

    let ez = e.get(xi, yi, CH_Z);
    let curl_x = e.get(xi, yi + 1, CH_Z) - ez;
    let curl_y = e.get(xi + 1, yi, CH_Z) - ez;
    let curl_z = (e.get(xi + 1, yi, CH_Y) - e.get(xi, yi, CH_Y))
        - (e.get(xi, yi + 1, CH_X) - e.get(xi, yi, CH_X));

    slab[[y, CH_X]] = alpha * prev.data[[x, y, CH_X]] - beta * curl_x;
    slab[[y, CH_Y]] = alpha * prev.data[[x, y, CH_Y]] + beta * curl_y;
    slab[[y, CH_Z]] = alpha * prev.data[[x, y, CH_Z]] - beta * curl_z;
}
