//! Step-time benchmarks: brute force vs. Barnes–Hut.
//!
//! Deterministic body clouds (no rand needed), timed with `Instant`, results
//! printed to stdout. `bench_step_curve` emits CSV-ish lines to paste into a
//! spreadsheet.

use std::time::Instant;

use crate::simulation::params::SimConstants;
use crate::simulation::solver::{BarnesHutSolver, BruteForceSolver, Solver};
use crate::simulation::states::{Body, NVec3};

/// Build a deterministic cloud of `n` unit-mass bodies.
fn make_bodies(n: usize) -> Vec<Body> {
    let mut bodies = Vec::with_capacity(n);
    for i in 0..n {
        let i_f = i as f64;
        let x = NVec3::new(
            (i_f * 0.37).sin() * 50.0,
            (i_f * 0.13).cos() * 50.0,
            (i_f * 0.07).sin() * 50.0,
        );
        bodies.push(Body::at_rest(x, 1.0));
    }
    bodies
}

fn bench_constants() -> SimConstants {
    SimConstants {
        central_mass: 0.0, // pure pairwise cost, no attractor bias
        ..SimConstants::default()
    }
}

/// Compare per-step times of both solvers over a range of N.
pub fn bench_solvers() {
    let ns = [200, 400, 800, 1600, 3200, 6400, 12800];
    let steps = 3;
    let dt = 0.01;
    let constants = bench_constants();

    for n in ns {
        let template = make_bodies(n);

        let mut direct = BruteForceSolver::new(constants);
        let mut bodies_direct = template.clone();
        // Warm up
        direct.solve(&mut bodies_direct, dt);
        let t0 = Instant::now();
        for _ in 0..steps {
            direct.solve(&mut bodies_direct, dt);
        }
        let direct_per_step = t0.elapsed().as_secs_f64() / steps as f64;

        let mut bh = BarnesHutSolver::new(constants);
        let mut bodies_bh = template.clone();
        bh.solve(&mut bodies_bh, dt);
        let t1 = Instant::now();
        for _ in 0..steps {
            bh.solve(&mut bodies_bh, dt);
        }
        let bh_per_step = t1.elapsed().as_secs_f64() / steps as f64;

        println!(
            "N = {n:6}, direct step = {direct_per_step:8.6} s, BH step = {bh_per_step:8.6} s"
        );
    }
}

/// Per-step times over a fine-grained range of N, as CSV.
pub fn bench_step_curve() {
    println!("N,direct_ms,bh_ms");

    let dt = 0.01;
    let constants = bench_constants();

    for n in (200..=12_800).step_by(200) {
        // Small n: average several steps to smooth noise; large n: one step
        let steps_direct = if n <= 800 { 5 } else { 1 };
        let steps_bh = if n <= 2000 { 3 } else { 1 };

        let template = make_bodies(n);

        let mut direct = BruteForceSolver::new(constants);
        let mut bodies_direct = template.clone();
        let t0 = Instant::now();
        for _ in 0..steps_direct {
            direct.solve(&mut bodies_direct, dt);
        }
        let ms_direct = t0.elapsed().as_secs_f64() * 1000.0 / steps_direct as f64;

        let mut bh = BarnesHutSolver::new(constants);
        let mut bodies_bh = template.clone();
        let t1 = Instant::now();
        for _ in 0..steps_bh {
            bh.solve(&mut bodies_bh, dt);
        }
        let ms_bh = t1.elapsed().as_secs_f64() * 1000.0 / steps_bh as f64;

        println!("{n},{ms_direct:.6},{ms_bh:.6}");
    }
}
