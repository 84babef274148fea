#![warn(clippy::pedantic)]

use approx::assert_relative_eq;
use petgraph::graph::{EdgeIndex, NodeIndex};
use truss2d::{force, point, BoundaryMask, SolverConfig, Truss};

const AREA: f64 = 0.01;
const ELASTIC_MODULUS: f64 = 1.0e5;

/// A 4 m x 3 m right triangle, pinned at the origin, on a roller at (4, 0) and
/// loaded at the apex.
fn triangle() -> (Truss, [NodeIndex; 3]) {
    let mut truss = Truss::new();
    let a = truss.add_joint(point(0.0, 0.0));
    let b = truss.add_joint(point(4.0, 0.0));
    let c = truss.add_joint(point(0.0, 3.0));
    truss.set_support(a, [true, true]).expect("joint exists");
    truss.set_support(b, [false, true]).expect("joint exists");
    truss.set_load(c, force(30.0, -40.0)).expect("joint exists");

    for (start, end) in [(a, b), (b, c), (a, c)] {
        let member = truss.add_member(start, end).expect("joints exist");
        truss
            .set_member_properties(member, AREA, ELASTIC_MODULUS)
            .expect("valid properties");
    }
    (truss, [a, b, c])
}

#[test]
fn displacements_match_hand_solution() {
    let (truss, [_, b, c]) = triangle();
    let analysis = truss.evaluate().expect("analysis succeeds");
    assert!(analysis.is_converged());

    let roller = analysis.node_displacement(b).expect("joint exists");
    let apex = analysis.node_displacement(c).expect("joint exists");
    assert_relative_eq!(roller.x, 0.12, epsilon = 1.0e-5);
    assert_eq!(roller.y, 0.0);
    assert_relative_eq!(apex.x, 0.315, epsilon = 1.0e-5);
    assert_relative_eq!(apex.y, -0.0525, epsilon = 1.0e-5);
}

#[test]
fn stresses_follow_member_order() {
    let (truss, _) = triangle();
    let analysis = truss.evaluate().expect("analysis succeeds");

    let expected = [3_000.0, -3_750.0, -1_750.0];
    assert_eq!(analysis.stresses().len(), expected.len());
    for (index, expected) in expected.into_iter().enumerate() {
        let stress = analysis
            .member_stress(EdgeIndex::new(index))
            .expect("member exists");
        assert_relative_eq!(stress, expected, epsilon = 1.0e-1);
    }
}

#[test]
fn reactions_balance_applied_loads() {
    let (truss, [a, b, c]) = triangle();
    let analysis = truss.evaluate().expect("analysis succeeds");

    let pin = analysis.node_reaction(a).expect("joint exists");
    let roller = analysis.node_reaction(b).expect("joint exists");
    let apex = analysis.node_reaction(c).expect("joint exists");
    assert_relative_eq!(pin.x, -30.0, epsilon = 1.0e-3);
    assert_relative_eq!(pin.y, 17.5, epsilon = 1.0e-3);
    assert_eq!(roller.x, 0.0);
    assert_relative_eq!(roller.y, 22.5, epsilon = 1.0e-3);
    assert_eq!((apex.x, apex.y), (0.0, 0.0));

    let total_x: f64 = analysis.reactions().iter().step_by(2).sum();
    let total_y: f64 = analysis.reactions().iter().skip(1).step_by(2).sum();
    assert_relative_eq!(total_x + 30.0, 0.0, epsilon = 1.0e-3);
    assert_relative_eq!(total_y - 40.0, 0.0, epsilon = 1.0e-3);
}

#[test]
fn relaxation_agrees_with_direct_factorisation() {
    let (truss, _) = triangle();
    let config = SolverConfig {
        tolerance: 1.0e-12,
        ..SolverConfig::default()
    };
    let analysis = truss.analyze(&config).expect("analysis succeeds");
    assert!(analysis.is_converged());

    let mask = BoundaryMask::from_constraints(&truss.constraints()).expect("zero supports");
    let reduced = mask
        .reduce_matrix(analysis.stiffness())
        .expect("matching dimensions");
    let loads = nalgebra::DVector::from_vec(vec![0.0, 0.0, 0.0, 0.0, 30.0, -40.0]);
    let reduced_loads = mask.reduce_vector(&loads).expect("matching dimensions");
    let direct = reduced.lu().solve(&reduced_loads).expect("reduced system is regular");
    let relaxed = mask
        .reduce_vector(analysis.displacements())
        .expect("matching dimensions");

    assert_relative_eq!(relaxed, direct, epsilon = 1.0e-9);
}

#[test]
fn global_stiffness_is_symmetric_and_singular_before_supports() {
    let (truss, _) = triangle();
    let analysis = truss.evaluate().expect("analysis succeeds");
    let stiffness = analysis.stiffness();

    assert_eq!(stiffness.shape(), (6, 6));
    assert_relative_eq!(*stiffness, stiffness.transpose(), epsilon = 1.0e-12);
    for column in stiffness.column_iter() {
        assert_relative_eq!(column.sum(), 0.0, epsilon = 1.0e-9);
    }
}

#[test]
fn tolerance_of_zero_exhausts_the_sweep_budget() {
    let (truss, _) = triangle();
    let config = SolverConfig {
        tolerance: 0.0,
        max_sweeps: 25,
        strict: false,
    };
    let analysis = truss.analyze(&config).expect("lenient solve");
    assert!(!analysis.is_converged());
    assert_eq!(analysis.solver().sweeps, 25);

    let strict = SolverConfig {
        strict: true,
        ..config
    };
    assert!(truss.analyze(&strict).is_err());
}
