//! Simulation domain: material model, sources, brush and the FDTD stepper

pub mod draw;
pub mod material;
pub mod simulation;
pub mod source;
