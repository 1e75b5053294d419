//! Releases a Gaussian pulse at the grid center and compares how the open
//! and reflective boundaries treat the outgoing wave.

use emsim::prelude::*;
use emsim::utilities::seed_gaussian_pulse;

fn run(reflective: bool, steps: usize, dt: f32) -> Vec<f64> {
    let mut sim = Simulation::new(SimulationConfig {
        width: 80,
        height: 80,
        cell_size: 1.0,
        reflective_boundary: reflective,
    })
    .expect("valid configuration");

    seed_gaussian_pulse(&mut sim, (40.0, 40.0), 4.0, 1.0);

    let mut history = Vec::with_capacity(steps + 1);
    history.push(total_energy(&sim));
    for _ in 0..steps {
        sim.step(dt);
        history.push(total_energy(&sim));
    }
    history
}

fn main() {
    let steps = 400;
    let dt = 0.2;

    println!("Gaussian pulse on an 80x80 vacuum grid, {steps} steps at dt={dt}");
    println!("{:>6} {:>14} {:>14}", "step", "open", "reflective");

    let open = run(false, steps, dt);
    let closed = run(true, steps, dt);

    for step in (0..=steps).step_by(50) {
        println!("{:>6} {:>14.6e} {:>14.6e}", step, open[step], closed[step]);
    }

    let ratio = open[steps] / closed[steps];
    println!("\nfinal open/reflective energy ratio: {ratio:.4}");
}
