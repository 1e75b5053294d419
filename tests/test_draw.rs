//! Brush containment and snapping against a live session


use emsim::prelude::*;
use test_utils::*;

#[test]
fn test_square_paint_alters_exactly_chebyshev_cells() {
    let mut sim = vacuum_sim(15, 15, true);
    let (cx, cy, half) = (7.0f32, 7.0f32, 3.0f32);
    sim.paint_material(
        BrushShape::Square,
        [cx, cy],
        half,
        Material::dielectric(6.0),
    );

    let material = sim.material();
    for x in 0..15i32 {
        for y in 0..15i32 {
            let chebyshev = (x as f32 - cx).abs().max((y as f32 - cy).abs());
            let eps = material.get(x as isize, y as isize, 0);
            if chebyshev < half {
                assert_eq!(eps, 6.0, "cell ({x},{y}) should be painted");
            } else {
                assert_eq!(eps, 1.0, "cell ({x},{y}) should keep its prior value");
            }
        }
    }
}

#[test]
fn test_ellipse_paint_alters_exactly_normalized_disk() {
    let mut sim = vacuum_sim(17, 17, true);
    let (cx, cy, radius) = (8.0f32, 8.0f32, 4.0f32);
    sim.paint_material(
        BrushShape::Ellipse,
        [cx, cy],
        radius,
        Material::conductor(1.5),
    );

    let material = sim.material();
    for x in 0..17i32 {
        for y in 0..17i32 {
            let d2 = ((x as f32 - cx).powi(2) + (y as f32 - cy).powi(2)) / (radius * radius);
            let sigma = material.get(x as isize, y as isize, 2);
            if d2 <= 1.0 {
                assert_eq!(sigma, 1.5);
            } else {
                assert_eq!(sigma, 0.0);
            }
        }
    }
}

#[test]
fn test_center_snaps_to_nearest_cell() {
    // Just under half a cell of drift snaps down, just over snaps up
    let mut low = vacuum_sim(9, 9, true);
    low.paint_material(
        BrushShape::Square,
        [4.4, 4.4],
        0.6,
        Material::dielectric(3.0),
    );
    assert_eq!(low.material().get(4, 4, 0), 3.0);
    assert_eq!(low.material().get(5, 5, 0), 1.0);

    let mut high = vacuum_sim(9, 9, true);
    high.paint_material(
        BrushShape::Square,
        [4.6, 4.6],
        0.6,
        Material::dielectric(3.0),
    );
    assert_eq!(high.material().get(5, 5, 0), 3.0);
    assert_eq!(high.material().get(4, 4, 0), 1.0);
}

#[test]
fn test_signal_draw_feeds_the_accumulator() {
    let mut sim = vacuum_sim(11, 11, true);
    let brush = Brush {
        shape: BrushShape::Square,
        size: 0.5,
        value: [0.0, 0.0, 2.0],
        keep: 0.0,
    };
    sim.draw(DrawTarget::Signal, &brush, [5.0, 5.0]);

    assert_eq!(sim.source_field().get(5, 5, CH_Z), 2.0);
    // The accumulator feeds the electric field on the next step
    sim.step_electric(0.5);
    assert!(sim.electric_field().get(5, 5, CH_Z) > 0.0);
}

#[test]
fn test_material_draw_invalidates_coefficients() {
    let mut sim = vacuum_sim(11, 11, true);
    sim.step(0.2);
    let generation = sim.coefficient_generation();

    // A signal draw leaves the cache alone
    let brush = Brush {
        shape: BrushShape::Square,
        size: 0.5,
        value: [0.0, 0.0, 1.0],
        keep: 0.0,
    };
    sim.draw(DrawTarget::Signal, &brush, [5.0, 5.0]);
    sim.step(0.2);
    assert_eq!(sim.coefficient_generation(), generation);

    // A material draw forces one recomputation
    sim.paint_material(
        BrushShape::Square,
        [5.0, 5.0],
        1.0,
        Material::dielectric(2.0),
    );
    sim.step(0.2);
    assert_eq!(sim.coefficient_generation(), generation + 1);
}

#[test]
fn test_edits_survive_subsequent_strokes() {
    // The swap discipline must carry earlier strokes through later ones
    let mut sim = vacuum_sim(21, 21, true);
    sim.paint_material(
        BrushShape::Square,
        [5.0, 5.0],
        1.5,
        Material::dielectric(4.0),
    );
    sim.paint_material(
        BrushShape::Square,
        [15.0, 15.0],
        1.5,
        Material::conductor(2.0),
    );

    assert_eq!(sim.material().get(5, 5, 0), 4.0);
    assert_eq!(sim.material().get(15, 15, 2), 2.0);
}
