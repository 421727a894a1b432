//! End-to-end solves of one plane-stress element.

use approx::assert_relative_eq;
use lamina_core::assembly::apply_displacements;
use lamina_core::solver::DenseLuSolver;
use lamina_core::{
    Coordinate, Error, GaussPointMapping, Material, Node, Quad4PlaneStress, SolverConfig, SolverKind,
    StructuralSolver, X, Y,
};

fn square_under_compression() -> Vec<Node<f64>> {
    vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(1.0, 0.0).fixed(),
        Node::new(1.0, 1.0).with_force(Y, -1000.0),
        Node::new(0.0, 1.0).with_force(Y, -1000.0),
    ]
}

const SQUARE_DISPLACEMENTS: [f64; 8] = [
    0.0,
    0.0,
    0.0,
    0.0,
    0.0010073800738007383,
    -0.009402214022140224,
    -0.0010073800738007377,
    -0.009402214022140223,
];

fn lifted() -> SolverConfig {
    SolverConfig {
        lift_prescribed_values: true,
        ..SolverConfig::default()
    }
}

fn cantilever() -> Vec<Node<f64>> {
    vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(2.0, 0.0).with_force(Y, -10.0),
        Node::new(2.0, 1.0).with_force(Y, -10.0),
        Node::new(0.0, 1.0).fixed(),
    ]
}

#[test]
fn test_unit_square_stiffness() {
    let mut solver = StructuralSolver::new(square_under_compression()).unwrap();
    solver.compute_stiffness(&Material::new(200_000.0, 0.3).unwrap()).unwrap();
    let k = solver.stiffness_matrix();

    let expected_row0 = [
        173076.92307692303,
        35714.2857142857,
        -134615.38461538462,
        -2747.2527472527463,
        24725.27472527475,
        -35714.2857142857,
        -63186.8131868132,
        2747.2527472527454,
    ];
    for (j, expected) in expected_row0.iter().enumerate() {
        assert_relative_eq!(k[(0, j)], *expected, epsilon = 1e-8, max_relative = 1e-12);
    }
    assert_relative_eq!(*k, k.transpose(), epsilon = 1e-9);
}

#[test]
fn test_unit_square_end_to_end() {
    let material = Material::new(200_000.0, 0.3).unwrap();
    let mut solver = StructuralSolver::new(square_under_compression()).unwrap();
    solver.compute_stiffness(&material).unwrap();
    solver.compute_force_vector().unwrap();

    // Rows and columns 0-3 become identity after elimination
    let mut k = solver.stiffness_matrix().clone();
    let mut f = solver.force_vector().clone();
    apply_displacements(solver.nodes(), &mut k, &mut f, false).unwrap();
    assert_eq!(k.shape(), (8, 8));
    assert_relative_eq!(k, k.transpose(), epsilon = 1e-9);
    for i in 0..4 {
        for j in 0..8 {
            let expected = if i == j { 1.0 } else { 0.0 };
            assert_eq!(k[(i, j)], expected);
            assert_eq!(k[(j, i)], expected);
        }
    }

    solver.compute_displacement_vector().unwrap();
    let u = solver.displacement_vector();
    for i in 0..4 {
        assert_eq!(u[i], 0.0);
    }
    for (i, expected) in SQUARE_DISPLACEMENTS.iter().enumerate().skip(4) {
        assert_relative_eq!(u[i], *expected, max_relative = 1e-10);
    }

    // Downward at the loaded nodes, antisymmetric in x
    assert!(u[5] < 0.0 && u[7] < 0.0);
    assert_relative_eq!(u[4], -u[6], max_relative = 1e-10);
    assert_relative_eq!(u[5], u[7], max_relative = 1e-10);
}

#[test]
fn test_unit_square_reactions_balance_loads() {
    let mut solver = StructuralSolver::new(square_under_compression()).unwrap();
    solver.solve(&Material::new(200_000.0, 0.3).unwrap()).unwrap();
    let r = solver.reactions();

    let sum_x = r[0] + r[2];
    let sum_y = r[1] + r[3];
    assert_relative_eq!(sum_x, 0.0, epsilon = 1e-8);
    assert_relative_eq!(sum_y, 2000.0, max_relative = 1e-10);
    for i in 4..8 {
        assert_eq!(r[i], 0.0);
    }
}

#[test]
fn test_cantilever_reference() {
    let material = Material::new(1000.0, 0.25).unwrap();
    let mut solver = StructuralSolver::new(cantilever()).unwrap();
    let u = solver.solve(&material).unwrap().clone();

    let expected = [0.0, 0.0, -9.0 / 220.0, -2.0 / 11.0, 9.0 / 220.0, -2.0 / 11.0, 0.0, 0.0];
    for (i, e) in expected.iter().enumerate() {
        assert_relative_eq!(u[i], *e, epsilon = 1e-12, max_relative = 1e-6);
    }
}

#[test]
fn test_backends_agree() {
    let material = Material::new(1000.0, 0.25).unwrap();

    let mut lu = StructuralSolver::new(cantilever()).unwrap();
    lu.solve(&material).unwrap();

    let config = SolverConfig {
        backend: SolverKind::Cholesky,
        ..SolverConfig::default()
    };
    let mut cholesky = StructuralSolver::new(cantilever()).unwrap().with_config(config);
    cholesky.solve(&material).unwrap();

    assert_relative_eq!(
        lu.displacement_vector(),
        cholesky.displacement_vector(),
        epsilon = 1e-12,
        max_relative = 1e-9
    );
}

#[test]
fn test_parallel_integration_matches() {
    let material = Material::new(1000.0, 0.25).unwrap();

    let mut serial = StructuralSolver::new(cantilever()).unwrap();
    serial.solve(&material).unwrap();

    let config = SolverConfig {
        parallel_integration: true,
        ..SolverConfig::default()
    };
    let mut parallel = StructuralSolver::new(cantilever()).unwrap().with_config(config);
    parallel.solve(&material).unwrap();

    assert_relative_eq!(
        serial.displacement_vector(),
        parallel.displacement_vector(),
        epsilon = 1e-12,
        max_relative = 1e-10
    );
}

#[test]
fn test_thickness_scales_displacements() {
    let material = Material::new(1000.0, 0.25).unwrap();
    let mut thick = StructuralSolver::new(cantilever())
        .unwrap()
        .with_element(Quad4PlaneStress::new(2.0).unwrap());
    let u = thick.solve(&material).unwrap();

    assert_relative_eq!(u[3], -1.0 / 11.0, max_relative = 1e-9);
    assert_relative_eq!(u[4], 9.0 / 440.0, max_relative = 1e-9);
}

#[test]
fn test_uniaxial_patch_with_forces() {
    let material = Material::new(1000.0, 0.0).unwrap();
    let nodes = vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(2.0, 0.0).with_force(X, 0.5),
        Node::new(2.0, 1.0).with_force(X, 0.5),
        Node::new(0.0, 1.0).with_displacement(X, 0.0),
    ];
    let mut solver = StructuralSolver::new(nodes).unwrap();
    let u = solver.solve(&material).unwrap().clone();

    assert_relative_eq!(u[2], 0.002, max_relative = 1e-10);
    assert_relative_eq!(u[4], 0.002, max_relative = 1e-10);
    for i in [3, 5, 7] {
        assert_relative_eq!(u[i], 0.0, epsilon = 1e-14);
    }

    // Constant stress σ_xx = F / (height * thickness)
    let stress = solver.stress(&material).unwrap();
    for sample in &stress.integration_points {
        assert_relative_eq!(sample.stress.0[0], 1.0, max_relative = 1e-10);
        assert_relative_eq!(sample.stress.0[1], 0.0, epsilon = 1e-10);
        assert_relative_eq!(sample.stress.0[2], 0.0, epsilon = 1e-10);
    }
}

fn stretched() -> Vec<Node<f64>> {
    vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(2.0, 0.0).with_displacement(X, 0.002),
        Node::new(2.0, 1.0).with_displacement(X, 0.002),
        Node::new(0.0, 1.0).with_displacement(X, 0.0),
    ]
}

#[test]
fn test_prescribed_stretch_is_decoupled() {
    let material = Material::new(1000.0, 0.25).unwrap();
    let mut solver = StructuralSolver::new(stretched()).unwrap();
    let u = solver.solve(&material).unwrap().clone();

    assert_eq!(u[2], 0.002);
    assert_eq!(u[4], 0.002);

    // Eliminated columns no longer load the free DOFs
    for i in [3, 5, 7] {
        assert_relative_eq!(u[i], 0.0, epsilon = 1e-15);
    }

    let r = solver.reactions();
    assert_relative_eq!(r[0], -8.0 / 15.0, max_relative = 1e-10);
    assert_relative_eq!(r[2], 8.0 / 15.0, max_relative = 1e-10);
    assert_relative_eq!(r[4], 8.0 / 15.0, max_relative = 1e-10);
    assert_relative_eq!(r[6], -8.0 / 15.0, max_relative = 1e-10);
}

#[test]
fn test_prescribed_settlement() {
    let material = Material::new(200_000.0, 0.3).unwrap();
    let nodes = vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(1.0, 0.0).fixed(),
        Node::new(1.0, 1.0).with_displacement(Y, -0.1),
        Node::new(0.0, 1.0).with_displacement(Y, -0.1),
    ];

    let mut plain = StructuralSolver::new(nodes.clone()).unwrap();
    let u = plain.solve(&material).unwrap();
    assert_eq!(u[5], -0.1);
    assert_eq!(u[7], -0.1);
    assert_relative_eq!(u[4], 0.0, epsilon = 1e-15);
    assert_relative_eq!(u[6], 0.0, epsilon = 1e-15);

    let mut lift = StructuralSolver::new(nodes).unwrap().with_config(lifted());
    let u = lift.solve(&material).unwrap();
    assert_eq!(u[5], -0.1);
    assert_relative_eq!(u[4], 3.0 / 280.0, max_relative = 1e-10);
    assert_relative_eq!(u[6], -3.0 / 280.0, max_relative = 1e-10);
}

#[test]
fn test_lifted_stretch_patch() {
    let nu = 0.25;
    let material = Material::new(1000.0, nu).unwrap();
    let mut solver = StructuralSolver::new(stretched()).unwrap().with_config(lifted());
    let u = solver.solve(&material).unwrap().clone();

    // Prescribed values are reproduced exactly
    assert_eq!(u[0], 0.0);
    assert_eq!(u[1], 0.0);
    assert_eq!(u[2], 0.002);
    assert_eq!(u[4], 0.002);
    assert_eq!(u[6], 0.0);

    // Free lateral contraction: ε_yy = -ν ε_xx
    assert_relative_eq!(u[3], 0.0, epsilon = 1e-14);
    assert_relative_eq!(u[5], -nu * 0.001, max_relative = 1e-10);
    assert_relative_eq!(u[7], -nu * 0.001, max_relative = 1e-10);

    let r = solver.reactions();
    assert_relative_eq!(r[2], 0.5, max_relative = 1e-10);
    assert_relative_eq!(r[4], 0.5, max_relative = 1e-10);
    assert_relative_eq!(r[0], -0.5, max_relative = 1e-10);
    assert_relative_eq!(r[6], -0.5, max_relative = 1e-10);

    let center = solver.displacement_at(&Coordinate::new(1.0, 0.5)).unwrap();
    assert_relative_eq!(center.x, 0.001, max_relative = 1e-10);
    assert_relative_eq!(center.y, -nu * 0.0005, max_relative = 1e-10);
}

#[test]
fn test_uniform_scaling() {
    let material = Material::new(200_000.0, 0.3).unwrap();
    let square = |s: f64| {
        vec![
            Node::new(0.0, 0.0),
            Node::new(s, 0.0),
            Node::new(s, s),
            Node::new(0.0, s),
        ]
    };
    let stiffness = |s: f64, config: SolverConfig| {
        let mut solver = StructuralSolver::new(square(s)).unwrap().with_config(config);
        solver.compute_stiffness(&material).unwrap();
        solver.stiffness_matrix().clone()
    };

    // Sampling at (±1/√3, ±1/√3): K00 = (D00 + D33)(s²/4 + 1/3) / s²
    let unit = stiffness(1.0, SolverConfig::default());
    let doubled = stiffness(2.0, SolverConfig::default());
    assert_relative_eq!(unit[(0, 0)], 173076.92307692303, max_relative = 1e-12);
    assert_relative_eq!(doubled[(0, 0)], 98901.0989010989, max_relative = 1e-12);
    assert_relative_eq!(doubled[(0, 2)], -60439.560439560446, max_relative = 1e-12);

    // Scaled Gauss points integrate exactly, and plane stress K is then size independent
    let scaled = SolverConfig {
        gauss_mapping: GaussPointMapping::Scaled,
        ..SolverConfig::default()
    };
    let unit_scaled = stiffness(1.0, scaled.clone());
    assert_relative_eq!(unit_scaled, stiffness(2.0, scaled), epsilon = 1e-8, max_relative = 1e-12);
    assert_relative_eq!(unit_scaled, doubled, epsilon = 1e-8, max_relative = 1e-12);
}

#[test]
fn test_zero_area_is_invalid_geometry() {
    let nodes = vec![
        Node::new(0.0, 0.0).fixed(),
        Node::new(1.0, 0.0).fixed(),
        Node::new(1.0, 0.0),
        Node::new(0.0, 0.0),
    ];
    let mut solver = StructuralSolver::new(nodes).unwrap();
    assert!(matches!(
        solver.solve(&Material::new(200_000.0, 0.3).unwrap()),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_clockwise_nodes_are_invalid_geometry() {
    let nodes = vec![
        Node::new(0.0, 0.0),
        Node::new(0.0, 1.0),
        Node::new(1.0, 1.0),
        Node::new(1.0, 0.0),
    ];
    let mut solver = StructuralSolver::new(nodes).unwrap();
    assert!(matches!(
        solver.compute_stiffness(&Material::new(200_000.0, 0.3).unwrap()),
        Err(Error::InvalidGeometry(_))
    ));
}

#[test]
fn test_without_displacements_is_underconstrained() {
    let nodes: Vec<_> = square_under_compression()
        .into_iter()
        .map(|mut n| {
            n.displacements.clear();
            n
        })
        .collect();
    let mut solver = StructuralSolver::new(nodes).unwrap();
    assert!(matches!(
        solver.solve(&Material::new(200_000.0, 0.3).unwrap()),
        Err(Error::UnderconstrainedSystem(_))
    ));
}

#[test]
fn test_single_support_is_underconstrained() {
    let nodes = vec![
        Node::new(0.0, 0.0).with_displacement(X, 0.0),
        Node::new(1.0, 0.0),
        Node::new(1.0, 1.0).with_force(Y, -1.0),
        Node::new(0.0, 1.0),
    ];
    let mut solver = StructuralSolver::new(nodes).unwrap();
    let material = Material::new(200_000.0, 0.3).unwrap();
    solver.compute_stiffness(&material).unwrap();
    solver.compute_force_vector().unwrap();

    assert!(matches!(
        solver.compute_displacement_vector_with(&DenseLuSolver::new()),
        Err(Error::UnderconstrainedSystem(_))
    ));
    // State is left untouched on failure
    assert!(solver.displacement_vector().iter().all(|&x| x == 0.0));
}

#[test]
fn test_bad_condition_direction() {
    let mut nodes = square_under_compression();
    nodes[2] = Node::new(1.0, 1.0).with_force(2, -1000.0);
    let mut solver = StructuralSolver::new(nodes).unwrap();
    assert!(matches!(
        solver.compute_force_vector(),
        Err(Error::DimensionMismatch(_))
    ));
}

#[test]
fn test_single_precision_solve() {
    let nodes = vec![
        Node::new(0.0_f32, 0.0).fixed(),
        Node::new(1.0, 0.0).fixed(),
        Node::new(1.0, 1.0).with_force(Y, -1000.0),
        Node::new(0.0, 1.0).with_force(Y, -1000.0),
    ];
    let mut solver = StructuralSolver::new(nodes).unwrap();
    let u = solver.solve(&Material::new(200_000.0_f32, 0.3).unwrap()).unwrap();

    for (i, expected) in SQUARE_DISPLACEMENTS.iter().enumerate().skip(4) {
        assert_relative_eq!(u[i], *expected as f32, max_relative = 1e-3);
    }
}
