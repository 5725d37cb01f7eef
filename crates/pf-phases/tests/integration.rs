//! Integration tests for pf-phases.

use pf_mesh::{Vector, generation};
use pf_phases::{
    ConstantThermo, Orientation, PhaseError, PhasePairKey, PhasePairRegistry, PhaseRegistry,
    PhaseSpec,
};

fn three_phases() -> PhaseRegistry {
    let mesh = generation::wall_bounded_column(5, 1.0, 0.1).unwrap();
    PhaseRegistry::new(
        vec![
            PhaseSpec::new("air", ConstantThermo::air())
                .diameter(3e-3)
                .alpha(0.2)
                .anisothermal(true)
                .velocity(Vector::new(0.0, 0.25, 0.0)),
            PhaseSpec::new("water", ConstantThermo::water())
                .alpha(0.7)
                .species(["H2O", "NaCl"]),
            PhaseSpec::new("sand", ConstantThermo::water())
                .alpha(0.1)
                .stationary(true),
        ],
        &mesh,
    )
    .unwrap()
}

#[test]
fn views_partition_phases() {
    let phases = three_phases();
    assert_eq!(phases.len(), 3);
    assert_eq!(phases.moving_phases().names(), vec!["air", "water"]);
    assert_eq!(phases.stationary_phases().names(), vec!["sand"]);
    assert_eq!(phases.anisothermal_phases().names(), vec!["air"]);
    assert_eq!(phases.multi_component_phases().names(), vec!["water"]);

    let sand = phases.find("sand").unwrap();
    assert!(sand.u().values().iter().all(|u| u.norm() == 0.0));
    let water = phases.find("water").unwrap();
    assert_eq!(water.y("NaCl").unwrap().values()[0], 0.5);
}

#[test]
fn duplicate_and_empty_phase_lists_are_rejected() {
    let mesh = generation::wall_bounded_column(2, 1.0, 1.0).unwrap();
    let err = PhaseRegistry::new(Vec::new(), &mesh).unwrap_err();
    assert_eq!(err, PhaseError::NoPhases);

    let err = PhaseRegistry::new(
        vec![
            PhaseSpec::new("air", ConstantThermo::air()),
            PhaseSpec::new("air", ConstantThermo::air()),
        ],
        &mesh,
    )
    .unwrap_err();
    assert!(matches!(err, PhaseError::DuplicatePhase { .. }));
}

#[test]
fn pairs_are_shared_across_keys() {
    let phases = three_phases();
    let mut pairs = PhasePairRegistry::new();
    let keys: Vec<PhasePairKey> = ["air in water", "water in air", "sand and water", "air and water"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    pairs.generate_pairs(&keys, &phases).unwrap();

    assert_eq!(pairs.len(), 2);
    let fwd = pairs.resolve(&keys[0]).unwrap();
    let rev = pairs.resolve(&keys[1]).unwrap();
    let sym = pairs.resolve(&keys[3]).unwrap();
    assert_eq!(fwd.orientation(), Orientation::Forward);
    assert_eq!(rev.orientation(), Orientation::Reverse);
    assert_eq!(sym.orientation(), Orientation::Unordered);
    assert!(std::ptr::eq(fwd.pair(), sym.pair()));

    let view = fwd.view(&phases);
    assert_eq!(view.dispersed().name(), "air");
    let ur = view.ur();
    assert!((ur.values()[0].y - 0.25).abs() < 1e-12);
    assert_eq!(rev.view(&phases).dispersed().name(), "water");
}

#[test]
fn one_direction_registers_its_twin() {
    let phases = three_phases();
    let mut pairs = PhasePairRegistry::new();
    pairs
        .generate_pairs([&PhasePairKey::ordered("water", "air")], &phases)
        .unwrap();
    assert!(pairs.contains(&PhasePairKey::unordered("air", "water")));
    let twin = pairs.get(&PhasePairKey::ordered("air", "water")).unwrap();
    assert_eq!(twin.orientation(), Orientation::Forward);
}

#[test]
fn eotvos_number_uses_the_dispersed_diameter() {
    let phases = three_phases();
    let mut pairs = PhasePairRegistry::new();
    let key = PhasePairKey::ordered("air", "water");
    pairs.generate_pairs([&key], &phases).unwrap();
    let view = pairs.resolve(&key).unwrap().view(&phases);

    let sigma = pf_mesh::VolScalarField::uniform("sigma", view.n_cells(), 0.07);
    let eo = view.eo(&sigma);
    let drho = view.continuous().rho().values()[0] - view.dispersed().rho().values()[0];
    let expected = 9.806_65 * drho * 3e-3 * 3e-3 / 0.07;
    assert!((eo.values()[0] - expected).abs() < 1e-9 * expected);
}

#[test]
fn temperature_and_mass_fractions_are_editable_in_place() {
    let mut phases = three_phases();
    let water_id = phases.id_of("water").unwrap();
    let water = phases.phase_mut(water_id);

    for t in water.t_mut().values_mut() {
        *t = 350.0;
    }
    if let Some(y) = water.y_mut("NaCl") {
        y.values_mut()[0] = 0.1;
    }
    assert!(water.y_mut("CO2").is_none());

    let water = phases.find("water").unwrap();
    assert!(water.t().values().iter().all(|&t| t == 350.0));
    assert_eq!(water.y("NaCl").unwrap().values()[0], 0.1);
}
