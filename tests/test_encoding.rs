//! Material-map round trips through a live session


use emsim::prelude::*;
use test_utils::*;

#[test]
fn test_representative_4x4_round_trip() {
    // Non-uniform (ε, µ, σ) values must survive encode/decode to f32
    // precision exactly
    let map = random_material_map(4, 4);
    let decoded = MaterialMap::decode(&map.encode()).unwrap();
    assert!(fields_identical(&decoded.cells, &map.cells));
    assert_eq!((decoded.width, decoded.height), (4, 4));
}

#[test]
fn test_session_save_load_round_trip() {
    let mut sim = vacuum_sim(12, 12, true);
    sim.paint_material(
        BrushShape::Ellipse,
        [6.0, 6.0],
        3.0,
        Material::dielectric(2.5),
    );
    sim.paint_material(
        BrushShape::Square,
        [2.0, 9.0],
        1.5,
        Material::conductor(0.75),
    );

    let saved = sim.save_material();
    let bytes = saved.to_deflate().unwrap();

    let mut restored = vacuum_sim(12, 12, true);
    restored.load_material(MaterialMap::from_deflate(&bytes).unwrap());

    assert!(fields_identical(restored.material(), sim.material()));
}

#[test]
fn test_load_resizes_to_map_dimensions() {
    let mut sim = vacuum_sim(8, 8, true);
    emsim::utilities::seed_gaussian_pulse(&mut sim, (4.0, 4.0), 1.5, 1.0);
    sim.step(0.2);
    assert!(total_energy(&sim) > 0.0);

    let map = random_material_map(20, 10);
    sim.load_material(map.clone());

    assert_eq!(sim.size(), (20, 10));
    assert!(fields_identical(sim.material(), &map.cells));
    // Reallocation cleared the fields and restarted time
    assert_eq!(total_energy(&sim), 0.0);
    assert_eq!(sim.time(), 0.0);
}

#[test]
fn test_legacy_map_loads_with_zero_conductivity() {
    let mut floats = vec![3.0, 2.0];
    for _ in 0..6 {
        floats.extend_from_slice(&[2.0, 1.5]);
    }
    let map = MaterialMap::decode(&floats).unwrap();

    let mut sim = vacuum_sim(3, 2, true);
    sim.load_material(map);
    assert_eq!(sim.material().get(1, 1, 0), 2.0);
    assert_eq!(sim.material().get(1, 1, 1), 1.5);
    assert_eq!(sim.material().get(1, 1, 2), 0.0);
}

#[test]
fn test_corrupt_transport_payload_is_an_error() {
    assert!(MaterialMap::from_deflate(&[0xde, 0xad, 0xbe, 0xef]).is_err());
}

#[test]
fn test_loaded_material_drives_the_next_step() {
    // Loading a map must refresh coefficients before the next step consumes
    // them
    let mut vacuum = vacuum_sim(16, 16, true);
    let mut dense = vacuum_sim(16, 16, true);
    dense.load_material(MaterialMap::uniform(16, 16, Material::dielectric(9.0)));

    emsim::utilities::seed_gaussian_pulse(&mut vacuum, (8.0, 8.0), 2.0, 1.0);
    emsim::utilities::seed_gaussian_pulse(&mut dense, (8.0, 8.0), 2.0, 1.0);
    for _ in 0..20 {
        vacuum.step(0.1);
        dense.step(0.1);
    }

    // In the ε=9 medium the wave travels at a third of the vacuum speed,
    // so the fields must differ
    assert!(!fields_identical(
        vacuum.electric_field(),
        dense.electric_field()
    ));
}
