use galsim::simulation::engine::SimulationEngine;
use galsim::simulation::galaxy::generate_galaxy;
use galsim::simulation::octree::{Octree, OctreeNode, MAX_DEPTH};
use galsim::simulation::params::SimConstants;
use galsim::simulation::solver::{BarnesHutSolver, BruteForceSolver, Solver};
use galsim::simulation::states::{total_momentum, Body, NVec3};
use galsim::configuration::config::{
    BodyConfig, EngineConfig, GalaxyConfig, ParametersConfig, ScenarioConfig, SolverConfig,
};
use galsim::simulation::scenario::Scenario;

/// Build a simple 2-body system separated along the x-axis, at rest
fn two_body_system(dist: f64, m1: f64, m2: f64) -> Vec<Body> {
    vec![
        Body::at_rest(NVec3::new(-dist / 2.0, 0.0, 0.0), m1),
        Body::at_rest(NVec3::new(dist / 2.0, 0.0, 0.0), m2),
    ]
}

/// Deterministic cloud of n bodies with varied masses
fn body_cloud(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 50.0,
                (i_f * 0.13).cos() * 50.0,
                (i_f * 0.07).sin() * 50.0,
            );
            Body::at_rest(x, 1.0 + (i % 7) as f64 * 0.5)
        })
        .collect()
}

/// Constants for isolated-system tests: no central attractor
fn isolated_constants() -> SimConstants {
    SimConstants {
        central_mass: 0.0,
        ..SimConstants::default()
    }
}

/// Reference pairwise force per unit mass at bodies[i], same softened law
/// as the tree
fn pairwise_force(bodies: &[Body], i: usize, g: f64, softening: f64) -> NVec3 {
    let soft2 = softening * softening;
    let mut force = NVec3::zeros();
    for (j, b) in bodies.iter().enumerate() {
        if j == i {
            continue;
        }
        let r = b.x - bodies[i].x;
        let d2 = r.norm_squared() + soft2;
        let inv_r = d2.sqrt().recip();
        let inv_r3 = inv_r * inv_r * inv_r;
        force += g * b.m * inv_r3 * r;
    }
    force
}

fn build_tree(bodies: &[Body]) -> Octree {
    let positions: Vec<NVec3> = bodies.iter().map(|b| b.x).collect();
    let masses: Vec<f64> = bodies.iter().map(|b| b.m).collect();
    let mut tree = Octree::new();
    tree.build(&positions, &masses);
    tree
}

// ==================================================================================
// Octree build tests
// ==================================================================================

#[test]
fn tree_root_aggregates_match_input() {
    let bodies = body_cloud(100);
    let tree = build_tree(&bodies);

    let root = &tree.nodes()[0];
    let mass: f64 = bodies.iter().map(|b| b.m).sum();
    let com: NVec3 = bodies.iter().map(|b| b.x * b.m).sum::<NVec3>() / mass;

    assert_eq!(root.particle_count, 100);
    assert!(
        (root.total_mass - mass).abs() < 1e-9 * mass,
        "root mass {} != {}",
        root.total_mass,
        mass
    );
    assert!(
        (root.com - com).norm() < 1e-8 * (1.0 + com.norm()),
        "root com {:?} != {:?}",
        root.com,
        com
    );
}

/// Every internal node's aggregates must equal the combination of its
/// children's, all the way down
fn check_aggregates(nodes: &[OctreeNode], idx: usize) {
    let node = &nodes[idx];
    let Some(first_child) = node.children_start else {
        return;
    };

    let mut mass = 0.0;
    let mut count = 0;
    let mut weighted_com = NVec3::zeros();
    for i in 0..8 {
        let child = &nodes[first_child + i];
        mass += child.total_mass;
        count += child.particle_count;
        weighted_com += child.com * child.total_mass;
        check_aggregates(nodes, first_child + i);
    }

    assert_eq!(count, node.particle_count);
    assert!((mass - node.total_mass).abs() < 1e-8 * node.total_mass.max(1.0));
    if mass > 0.0 {
        let com = weighted_com / mass;
        assert!(
            (com - node.com).norm() < 1e-8 * (1.0 + node.com.norm()),
            "node {idx} com {:?} != children {:?}",
            node.com,
            com
        );
    }
}

#[test]
fn tree_subtree_aggregates_are_consistent() {
    let bodies = body_cloud(200);
    let tree = build_tree(&bodies);
    check_aggregates(tree.nodes(), 0);
}

#[test]
fn tree_of_empty_input_is_empty() {
    let mut tree = Octree::new();
    tree.build(&[], &[]);
    assert!(tree.is_empty());
    assert_eq!(
        tree.calculate_force(NVec3::zeros(), 1.0, 0.5, 0.5),
        NVec3::zeros()
    );
}

#[test]
fn coincident_bodies_terminate() {
    // Identical positions would subdivide forever without the depth cap;
    // they must end up merged in one deep leaf instead
    let p = NVec3::new(1.0, 2.0, 3.0);
    let positions = [p, p, p];
    let masses = [1.0, 2.0, 3.0];

    let mut tree = Octree::new();
    tree.build(&positions, &masses);

    let root = &tree.nodes()[0];
    assert_eq!(root.particle_count, 3);
    assert!((root.total_mass - 6.0).abs() < 1e-12);
    assert!(tree.nodes().len() <= 1 + 8 * MAX_DEPTH);

    let f = tree.calculate_force(NVec3::zeros(), 1.0, 0.5, 0.5);
    assert!(f.norm().is_finite());
}

// ==================================================================================
// Force evaluation tests
// ==================================================================================

#[test]
fn theta_zero_matches_brute_force() {
    let bodies = body_cloud(50);
    let tree = build_tree(&bodies);
    let (g, softening) = (1.0, 0.5);

    for i in 0..bodies.len() {
        let approx = tree.calculate_force(bodies[i].x, g, softening, 0.0);
        let exact = pairwise_force(&bodies, i, g, softening);
        let tol = 1e-4 * exact.norm().max(1e-12);
        assert!(
            (approx - exact).norm() <= tol,
            "body {i}: tree {:?} vs exact {:?}",
            approx,
            exact
        );
    }
}

#[test]
fn two_body_analytic_acceleration() {
    // Light and very heavy body a distance d apart; the force per unit mass
    // on the light one should follow the softened inverse-square law
    let (d, g, softening, theta) = (10.0, 1.0, 0.5, 0.5);
    let bodies = two_body_system(d, 1.0, 1.0e6);
    let tree = build_tree(&bodies);

    let accel = tree.calculate_force(bodies[0].x, g, softening, theta);
    let expected = g * 1.0e6 * d / (d * d + softening * softening).powf(1.5);

    assert!(
        (accel.norm() - expected).abs() < 1e-3 * expected,
        "got {}, expected {}",
        accel.norm(),
        expected
    );
    // and it must pull toward the heavy body (+x)
    assert!(accel.x > 0.0);
}

#[test]
fn force_query_is_idempotent() {
    let bodies = body_cloud(64);
    let tree = build_tree(&bodies);
    let query = NVec3::new(3.0, -2.0, 7.0);

    let f1 = tree.calculate_force(query, 1.0, 0.5, 0.5);
    let f2 = tree.calculate_force(query, 1.0, 0.5, 0.5);
    assert_eq!(f1, f2);
}

// ==================================================================================
// Integrator / solver tests
// ==================================================================================

#[test]
fn momentum_conserved_two_body() {
    let mut bodies = two_body_system(2.0, 1.0, 3.0);
    bodies[0].v = NVec3::new(0.0, 0.4, 0.0);
    bodies[1].v = NVec3::new(0.0, -0.1, 0.1);

    let constants = SimConstants {
        softening: 0.05,
        ..isolated_constants()
    };
    let mut engine = SimulationEngine::new(
        constants,
        Box::new(BarnesHutSolver::new(constants)),
    );
    engine.set_bodies(bodies);

    let p0 = total_momentum(engine.bodies());
    for _ in 0..500 {
        engine.step(0.001);
    }
    let p1 = total_momentum(engine.bodies());

    assert!(
        (p1 - p0).norm() < 1e-8,
        "momentum drifted from {:?} to {:?}",
        p0,
        p1
    );
}

#[test]
fn step_on_empty_body_store_is_noop() {
    let constants = SimConstants::default();
    let mut engine = SimulationEngine::new(
        constants,
        Box::new(BarnesHutSolver::new(constants)),
    );

    engine.step(0.016);

    assert!(engine.bodies().is_empty());
    assert!(engine.nodes().is_empty());
    assert_eq!(engine.time(), 0.0);
}

#[test]
fn static_bodies_pin_but_attract() {
    let mut heavy = Body::at_rest(NVec3::zeros(), 1.0e6);
    heavy.is_static = true;
    let light = Body::at_rest(NVec3::new(10.0, 0.0, 0.0), 1.0);

    let constants = isolated_constants();
    let mut engine = SimulationEngine::new(
        constants,
        Box::new(BarnesHutSolver::new(constants)),
    );
    engine.set_bodies(vec![heavy, light]);

    for _ in 0..10 {
        engine.step(0.001);
    }

    let bodies = engine.bodies();
    assert_eq!(bodies[0].x, NVec3::zeros());
    assert_eq!(bodies[0].v, NVec3::zeros());
    // the light body is falling toward the pinned mass
    assert!(bodies[1].v.x < 0.0);
    assert!(bodies[1].x.x < 10.0);
}

#[test]
fn dt_is_clamped() {
    // One drifting body, no forces on it: a huge dt must advance the
    // position by at most v * max_dt
    let mut body = Body::at_rest(NVec3::zeros(), 1.0);
    body.v = NVec3::new(1.0, 0.0, 0.0);

    let constants = isolated_constants();
    let mut engine = SimulationEngine::new(
        constants,
        Box::new(BarnesHutSolver::new(constants)),
    );
    engine.set_bodies(vec![body]);

    engine.step(10.0);

    let x = engine.bodies()[0].x.x;
    assert!(
        (x - constants.max_dt).abs() < 1e-12,
        "expected drift of {}, got {}",
        constants.max_dt,
        x
    );
}

#[test]
fn solvers_agree_at_theta_zero() {
    let bodies = body_cloud(30);
    let constants = SimConstants {
        theta: 0.0,
        ..isolated_constants()
    };

    let mut bh_bodies = bodies.clone();
    let mut bf_bodies = bodies;
    let mut bh = BarnesHutSolver::new(constants);
    let mut bf = BruteForceSolver::new(constants);

    for _ in 0..10 {
        bh.solve(&mut bh_bodies, 0.005);
        bf.solve(&mut bf_bodies, 0.005);
    }

    for (a, b) in bh_bodies.iter().zip(bf_bodies.iter()) {
        assert!(
            (a.x - b.x).norm() < 1e-6 * (1.0 + b.x.norm()),
            "positions diverged: {:?} vs {:?}",
            a.x,
            b.x
        );
    }
}

// ==================================================================================
// Galaxy generator tests
// ==================================================================================

#[test]
fn galaxy_generation_is_deterministic() {
    let cfg = GalaxyConfig {
        num_particles: 500,
        ..GalaxyConfig::default()
    };
    let constants = SimConstants::default();

    let a = generate_galaxy(&cfg, &constants, 42);
    let b = generate_galaxy(&cfg, &constants, 42);
    let c = generate_galaxy(&cfg, &constants, 43);

    assert_eq!(a.len(), 500);
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.x, y.x);
        assert_eq!(x.v, y.v);
    }
    assert!(a.iter().zip(c.iter()).any(|(x, y)| x.x != y.x));
}

#[test]
fn galaxy_bodies_are_well_formed() {
    let cfg = GalaxyConfig {
        num_particles: 1000,
        ..GalaxyConfig::default()
    };
    let constants = SimConstants::default();
    let bodies = generate_galaxy(&cfg, &constants, 7);

    for b in &bodies {
        assert!(b.m > 0.0);
        assert!(!b.is_static);
        assert!(b.v.norm().is_finite());
        // sampled radii are clamped to the disk radius in the orbital plane
        let planar = (b.x.x * b.x.x + b.x.z * b.x.z).sqrt();
        assert!(planar <= cfg.radius + 1e-9);
    }
}

// ==================================================================================
// Scenario / configuration tests
// ==================================================================================

fn minimal_config(bodies: Vec<BodyConfig>) -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            solver: SolverConfig::BarnesHut,
            theta: Some(0.5),
        },
        parameters: ParametersConfig {
            t_end: 1.0,
            dt: 0.01,
            max_dt: 0.05,
            seed: 1,
            g: 1.0,
            central_mass: 0.0,
            softening: 0.5,
            attractor_softening: 1.0,
        },
        galaxy: None,
        bodies,
    }
}

#[test]
fn scenario_rejects_non_positive_mass() {
    let cfg = minimal_config(vec![BodyConfig {
        x: vec![0.0, 0.0, 0.0],
        v: vec![0.0, 0.0, 0.0],
        m: 0.0,
        is_static: false,
    }]);
    assert!(Scenario::build_scenario(cfg).is_err());
}

#[test]
fn scenario_rejects_wrong_vector_arity() {
    let cfg = minimal_config(vec![BodyConfig {
        x: vec![0.0, 0.0],
        v: vec![0.0, 0.0, 0.0],
        m: 1.0,
        is_static: false,
    }]);
    assert!(Scenario::build_scenario(cfg).is_err());
}

#[test]
fn scenario_builds_runnable_engine() {
    let cfg = ScenarioConfig {
        galaxy: Some(GalaxyConfig {
            num_particles: 100,
            ..GalaxyConfig::default()
        }),
        ..minimal_config(vec![BodyConfig {
            x: vec![0.0, 0.0, 0.0],
            v: vec![0.0, 0.0, 0.0],
            m: 5.0,
            is_static: true,
        }])
    };

    let mut scenario = Scenario::build_scenario(cfg).expect("valid scenario");
    assert_eq!(scenario.engine.bodies().len(), 101);

    scenario.engine.step(scenario.dt);
    assert!(!scenario.engine.nodes().is_empty());
}
