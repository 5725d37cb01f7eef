//! Integration tests for pf-models against real phases on a small mesh.

use std::sync::Arc;

use pf_core::{Real, Tolerances, nearly_equal};
use pf_mesh::{PolyMesh, Vector, VolScalarField, fvc, generation};
use pf_models::{
    BlendedInterfacialModel, Dict, Drag, DragModel, ModelError, ModelFamily, NoBlending,
    SchillerNaumann, WallDamping, WallDampingModel, blending,
};
use pf_phases::{
    ConstantThermo, PairView, PhasePair, PhasePairKey, PhasePairRegistry, PhaseRegistry,
    PhaseSpec,
};

fn setup(alpha_air: Real) -> (PolyMesh, PhaseRegistry, PhasePair) {
    let mesh = generation::wall_bounded_column(6, 0.06, 0.01).unwrap();
    let phases = PhaseRegistry::new(
        vec![
            PhaseSpec::new("air", ConstantThermo::air())
                .diameter(3e-3)
                .alpha(alpha_air)
                .velocity(Vector::new(0.0, 0.2, 0.0)),
            PhaseSpec::new("water", ConstantThermo::water())
                .diameter(1e-4)
                .alpha(1.0 - alpha_air),
        ],
        &mesh,
    )
    .unwrap();
    let key = PhasePairKey::unordered("air", "water");
    let mut pairs = PhasePairRegistry::new();
    pairs.generate_pairs([&key], &phases).unwrap();
    let pair = pairs.resolve(&key).unwrap().pair().clone();
    (mesh, phases, pair)
}

fn linear_blending() -> Arc<dyn pf_models::BlendingMethod> {
    let dict = Dict::from_yaml_str(
        "blending.drag",
        "type: linear\n\
         minFullyContinuousAlpha: { air: 0.7, water: 0.7 }\n\
         minPartlyContinuousAlpha: { air: 0.3, water: 0.3 }\n",
    )
    .unwrap();
    let names = vec!["air".to_string(), "water".to_string()];
    Arc::from(blending::factory().create(&dict, &names).unwrap())
}

fn schiller_naumann(key: &PhasePairKey) -> Box<dyn DragModel> {
    Drag::create(&Dict::default().with("type", "SchillerNaumann"), key).unwrap()
}

#[test]
fn schiller_naumann_coefficient_by_hand() {
    let (_mesh, phases, _pair) = setup(0.1);
    let air = phases.find("air").unwrap();
    let water = phases.find("water").unwrap();
    let view = PairView::new(air, water, true);

    let re: Real = 0.2 * 3e-3 / (8.9e-4 / 997.0);
    let cd_re = 24.0 * (1.0 + 0.15 * re.powf(0.687));
    let ki = 0.75 * cd_re * 8.9e-4 / (3e-3 * 3e-3);
    let expected = 0.1 * ki;

    let k = SchillerNaumann { residual_re: 1e-3 }.k(&view);
    let tol = Tolerances { abs: 1e-9, rel: 1e-10 };
    assert!(k.values().iter().all(|&v| nearly_equal(v, expected, tol)));
}

#[test]
fn blend_reduces_to_single_direction_at_end_points() {
    let key_12 = PhasePairKey::ordered("air", "water");
    let key_21 = PhasePairKey::ordered("water", "air");

    for (alpha_air, dispersed, continuous) in [(0.0, "air", "water"), (1.0, "water", "air")] {
        let (_mesh, phases, pair) = setup(alpha_air);
        let blended: BlendedInterfacialModel<dyn DragModel> = BlendedInterfacialModel::new(
            pair,
            Some(schiller_naumann(&key_12)),
            Some(schiller_naumann(&key_21)),
            linear_blending(),
        )
        .unwrap();
        let k = blended.evaluate(&phases, |m, view| m.k(view));

        let view = PairView::new(
            phases.find(dispersed).unwrap(),
            phases.find(continuous).unwrap(),
            true,
        );
        let single = SchillerNaumann { residual_re: 1e-3 }.k(&view);
        for (b, s) in k.values().iter().zip(single.values()) {
            assert!((b - s).abs() <= 1e-12 * s.abs().max(1.0));
        }
    }
}

#[test]
fn missing_side_contributes_zero() {
    let (_mesh, phases, pair) = setup(0.5);
    let key_12 = PhasePairKey::ordered("air", "water");
    let blended: BlendedInterfacialModel<dyn DragModel> = BlendedInterfacialModel::new(
        pair.clone(),
        Some(schiller_naumann(&key_12)),
        None,
        linear_blending(),
    )
    .unwrap();
    let k = blended.evaluate(&phases, |m, view| m.k(view));

    let view = PairView::new(
        phases.find("air").unwrap(),
        phases.find("water").unwrap(),
        true,
    );
    let full = SchillerNaumann { residual_re: 1e-3 }.k(&view);
    // alpha 0.5 on both sides: even split
    assert!((k.values()[0] - 0.5 * full.values()[0]).abs() < 1e-9);

    let err = BlendedInterfacialModel::<dyn DragModel>::new(
        pair,
        None,
        None,
        Arc::new(NoBlending::new("water")),
    )
    .unwrap_err();
    assert!(matches!(err, ModelError::EmptyBlend { .. }));
}

#[test]
fn wall_damping_none_is_identity_and_zeroes_near_wall_cells() {
    let (mesh, phases, _pair) = setup(0.2);
    let key = PhasePairKey::ordered("air", "water");
    let view = PairView::new(
        phases.find("air").unwrap(),
        phases.find("water").unwrap(),
        true,
    );
    let ones = VolScalarField::uniform("ones", 6, 1.0);

    let none = WallDamping::create(&Dict::default().with("type", "none"), &key).unwrap();
    assert_eq!(none.damp_scalar(&ones, &view, &mesh).values(), ones.values());

    let zeroing = WallDamping::create(
        &Dict::default()
            .with("type", "none")
            .with("zeroInNearWallCells", true),
        &key,
    )
    .unwrap();
    let damped = zeroing.damp_scalar(&ones, &view, &mesh);
    assert_eq!(damped.values(), &[0.0, 1.0, 1.0, 1.0, 1.0, 0.0]);

    // first cell centre is 5 mm from the bottom wall
    let linear = WallDamping::create(
        &Dict::default().with("type", "linear").with("Cd", 2.0),
        &key,
    )
    .unwrap();
    let limiter = linear.limiter(&view, &mesh);
    assert!((limiter.values()[0] - 0.005 / (2.0 * 3e-3)).abs() < 1e-12);
    assert_eq!(limiter.values()[2], 1.0);

    let faces = linear.damp_surface(&fvc::flux(&mesh, view.dispersed().u()), &view, &mesh);
    assert_eq!(faces.len(), 7);
}

#[test]
fn unknown_wall_damping_lists_profiles() {
    let key = PhasePairKey::ordered("air", "water");
    let err = WallDamping::create(&Dict::default().with("type", "exponential"), &key)
        .unwrap_err();
    match err {
        ModelError::UnknownModelType { known, .. } => {
            assert_eq!(known, vec!["cosine", "linear", "none", "sine"]);
        }
        other => panic!("unexpected error {other}"),
    }
}
