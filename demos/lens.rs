//! Paints a dielectric lens in front of an oscillating point source and
//! renders the electric energy distribution as ASCII art.

use emsim::prelude::*;

fn main() {
    let (width, height) = (96usize, 48usize);
    let mut sim = Simulation::new(SimulationConfig {
        width,
        height,
        cell_size: 1.0,
        reflective_boundary: false,
    })
    .expect("valid configuration");

    // A circular ε=4 lens between the source and the far wall
    sim.paint_material(
        BrushShape::Ellipse,
        [36.0, 24.0],
        10.0,
        Material::dielectric(4.0),
    );

    sim.add_source(SourceDescriptor::Point {
        position: [12.0, 24.0],
        amplitude: 2.0,
        frequency: 0.05,
        turn_off_time: None,
    });

    for _ in 0..800 {
        sim.step(0.2);
    }

    // Downsample Σ E² per character cell onto an ASCII ramp
    let ramp: &[u8] = b" .:-=+*#%@";
    let e = sim.electric_field();
    let mut peak = f64::MIN;
    let mut rows = Vec::with_capacity(height / 2);
    for y in (0..height).step_by(2) {
        let mut row = Vec::with_capacity(width);
        for x in 0..width {
            let mut energy = 0.0f64;
            for c in 0..3 {
                let v = e.get(x as isize, y as isize, c) as f64;
                energy += v * v;
            }
            peak = peak.max(energy);
            row.push(energy);
        }
        rows.push(row);
    }

    for row in rows {
        let line: String = row
            .iter()
            .map(|&energy| {
                let t = (energy / peak).sqrt();
                let idx = (t * (ramp.len() - 1) as f64).round() as usize;
                ramp[idx.min(ramp.len() - 1)] as char
            })
            .collect();
        println!("{line}");
    }

    println!(
        "\nt={:.1}  total energy={:.3e}",
        sim.time(),
        total_energy(&sim)
    );
}
