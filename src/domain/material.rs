//! Material model and cached lossy-medium update coefficients
//!
//! Each cell carries (permittivity, permeability, conductivity). The FDTD
//! update consumes them only through derived per-step alpha/beta
//! coefficients, which are recomputed lazily: only when the material data
//! changed or the requested time step differs from the one the cache was
//! built for.

use ndarray::Array2;

use crate::engine::array::VectorField;

/// Material field channel indices
pub const CH_EPS: usize = 0;
pub const CH_MU: usize = 1;
pub const CH_SIGMA: usize = 2;

/// Per-cell material triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Relative permittivity (ε), strictly positive
    pub permittivity: f32,
    /// Relative permeability (µ), strictly positive
    pub permeability: f32,
    /// Conductivity (σ), non-negative
    pub conductivity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self::vacuum()
    }
}

impl Material {
    /// Free space: ε=1, µ=1, σ=0
    pub fn vacuum() -> Self {
        Self {
            permittivity: 1.0,
            permeability: 1.0,
            conductivity: 0.0,
        }
    }

    /// Lossless dielectric with the given relative permittivity
    pub fn dielectric(permittivity: f32) -> Self {
        Self {
            permittivity,
            permeability: 1.0,
            conductivity: 0.0,
        }
    }

    /// Lossy medium with the given conductivity
    pub fn conductor(conductivity: f32) -> Self {
        Self {
            permittivity: 1.0,
            permeability: 1.0,
            conductivity,
        }
    }

    /// Material triple as a field sample, channel order (ε, µ, σ)
    pub fn as_sample(&self) -> [f32; 3] {
        [self.permittivity, self.permeability, self.conductivity]
    }
}

/// Per-cell leapfrog update coefficients for both half-steps.
///
/// `alpha` is the fraction of the previous field value retained, `beta` the
/// coupling strength to the curl term. The `(1 + c)` division is the
/// exponential-time-differencing discretization that stays stable for large
/// conductivities where naive forward-Euler damping blows up.
#[derive(Debug, Clone)]
pub struct UpdateCoefficients {
    pub alpha_e: Array2<f32>,
    pub beta_e: Array2<f32>,
    pub alpha_h: Array2<f32>,
    pub beta_h: Array2<f32>,
}

impl UpdateCoefficients {
    fn zeros(width: usize, height: usize) -> Self {
        Self {
            alpha_e: Array2::zeros((width, height)),
            beta_e: Array2::zeros((width, height)),
            alpha_h: Array2::zeros((width, height)),
            beta_h: Array2::zeros((width, height)),
        }
    }
}

/// Lazily recomputed coefficient cache.
#[derive(Debug, Clone)]
pub struct CoefficientCache {
    coefficients: UpdateCoefficients,
    /// Time step the cached coefficients were computed for
    computed_for_dt: Option<f32>,
    /// Set whenever material data or the cell size changes
    dirty: bool,
    /// Bumped on every recomputation; tests observe it to assert amortization
    generation: u64,
}

impl CoefficientCache {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            coefficients: UpdateCoefficients::zeros(width, height),
            computed_for_dt: None,
            dirty: true,
            generation: 0,
        }
    }

    /// Reallocate for new grid dimensions and force recomputation
    pub fn resize(&mut self, width: usize, height: usize) {
        self.coefficients = UpdateCoefficients::zeros(width, height);
        self.computed_for_dt = None;
        self.dirty = true;
    }

    /// Invalidate without reallocating
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Number of recomputations performed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The cached coefficients as-is. Callers must have gone through
    /// [`CoefficientCache::ensure`] for the time step they are about to use.
    pub fn cached(&self) -> &UpdateCoefficients {
        &self.coefficients
    }

    /// Return coefficients valid for `dt`, recomputing only when the cache
    /// is stale or was built for a different time step.
    pub fn ensure(
        &mut self,
        material: &VectorField,
        dt: f32,
        cell_size: f32,
    ) -> &UpdateCoefficients {
        let stale = self.dirty || self.computed_for_dt != Some(dt);
        if stale {
            self.recompute(material, dt, cell_size);
            self.computed_for_dt = Some(dt);
            self.dirty = false;
            self.generation += 1;
        }
        &self.coefficients
    }

    fn recompute(&mut self, material: &VectorField, dt: f32, cell_size: f32) {
        let (width, height) = (material.width(), material.height());
        for x in 0..width {
            for y in 0..height {
                let eps = material.data[[x, y, CH_EPS]];
                let mu = material.data[[x, y, CH_MU]];
                let sigma = material.data[[x, y, CH_SIGMA]];

                let (alpha_e, beta_e) = lossy_coefficients(sigma, eps, dt, cell_size);
                let (alpha_h, beta_h) = lossy_coefficients(sigma, mu, dt, cell_size);

                self.coefficients.alpha_e[[x, y]] = alpha_e;
                self.coefficients.beta_e[[x, y]] = beta_e;
                self.coefficients.alpha_h[[x, y]] = alpha_h;
                self.coefficients.beta_h[[x, y]] = beta_h;
            }
        }
    }
}

/// Lossy-medium coefficient pair for one field quantity with damping σ and
/// medium constant κ (κ=ε for the electric update, κ=µ for the magnetic).
#[inline]
fn lossy_coefficients(sigma: f32, kappa: f32, dt: f32, cell_size: f32) -> (f32, f32) {
    let c = sigma * dt / (2.0 * kappa);
    let alpha = (1.0 - c) / (1.0 + c);
    let beta = dt / (kappa * cell_size) / (1.0 + c);
    (alpha, beta)
}
