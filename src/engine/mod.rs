//! Core storage engine for field simulations

pub mod array;
pub mod buffer;

pub use array::VectorField;
pub use buffer::DoubleBuffer;
