//! Diagnostics and helpers around the solver core

pub mod encoding;

pub use encoding::MaterialMap;

use crate::domain::simulation::Simulation;
use crate::engine::array::CH_Z;

/// Total electric field energy measure, Σ E².
pub fn electric_energy(sim: &Simulation) -> f64 {
    sim.electric_field().norm_squared()
}

/// Total magnetic field energy measure, Σ H².
pub fn magnetic_energy(sim: &Simulation) -> f64 {
    sim.magnetic_field().norm_squared()
}

/// Combined field energy measure, Σ E² + Σ H².
pub fn total_energy(sim: &Simulation) -> f64 {
    electric_energy(sim) + magnetic_energy(sim)
}

/// Seed a Gaussian pulse into the Ez component, centered at `center` (cell
/// coordinates) with the given standard deviation in cells. Useful for
/// boundary experiments that need a field without running a source.
pub fn seed_gaussian_pulse(sim: &mut Simulation, center: (f32, f32), sigma: f32, amplitude: f32) {
    sim.edit_electric_field(|x, y, mut cell| {
        let dx = x as f32 - center.0;
        let dy = y as f32 - center.1;
        let r2 = dx * dx + dy * dy;
        cell[CH_Z] += amplitude * (-r2 / (2.0 * sigma * sigma)).exp();
        cell
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::simulation::SimulationConfig;

    #[test]
    fn test_seeded_pulse_has_energy() {
        let mut sim = Simulation::new(SimulationConfig {
            width: 16,
            height: 16,
            cell_size: 1.0,
            reflective_boundary: true,
        })
        .unwrap();
        assert_eq!(total_energy(&sim), 0.0);

        seed_gaussian_pulse(&mut sim, (8.0, 8.0), 2.0, 1.0);
        assert!(electric_energy(&sim) > 0.0);
        assert_eq!(magnetic_energy(&sim), 0.0);
    }
}
