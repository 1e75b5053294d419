//! EMSim - A Rust library for interactive 2D electromagnetic field simulation
//!
//! This library implements an FDTD (Finite-Difference Time-Domain) solver on a
//! staggered Yee grid: spatially varying permittivity, permeability and
//! conductivity are painted onto the grid, oscillating point sources inject
//! energy, and Maxwell's equations are integrated forward in time with a
//! leapfrog scheme. Rendering, UI and sharing live outside this crate and only
//! read the solver's current buffers.

pub mod domain;
pub mod engine;
pub mod utilities;

// Re-export commonly used types
pub use domain::draw::{Brush, BrushShape, DrawTarget};
pub use domain::material::Material;
pub use domain::simulation::{Simulation, SimulationConfig};
pub use domain::source::SourceDescriptor;
pub use engine::array::VectorField;
pub use utilities::MaterialMap;

/// Errors surfaced at the configuration and decode boundaries.
///
/// The stepper itself never returns errors: out-of-bounds reads yield zero
/// and stale coefficient caches are refreshed silently.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidGrid { width: usize, height: usize },
    #[error("cell size must be positive, got {0}")]
    InvalidCellSize(f32),
    #[error("material map payload is corrupt: {0}")]
    CorruptMaterialMap(String),
    #[error("unsupported material map version tag {0}")]
    UnsupportedVersion(i32),
    #[error("source descriptor decode failed: {0}")]
    SourceDecode(#[from] serde_json::Error),
    #[error("transport codec failed: {0}")]
    Transport(#[from] std::io::Error),
}

pub mod prelude {
    //! Common imports for using the EMSim library
    pub use crate::domain::draw::{Brush, BrushShape, DrawTarget};
    pub use crate::domain::material::Material;
    pub use crate::domain::simulation::{Simulation, SimulationConfig};
    pub use crate::domain::source::SourceDescriptor;
    pub use crate::engine::array::{VectorField, CH_X, CH_Y, CH_Z};
    pub use crate::utilities::{electric_energy, magnetic_energy, total_energy, MaterialMap};
    pub use crate::Error;
}
