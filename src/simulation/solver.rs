//! Force solvers for the n-body engine.
//!
//! A [`Solver`] advances the body array by one Velocity–Verlet step. Two
//! implementations share the contract and the same constants, so they can be
//! swapped at configuration time and stay physically consistent:
//!
//! - [`BarnesHutSolver`] — approximate `O(N log N)` forces from a linear
//!   octree rebuilt every step, controlled by `theta`.
//! - [`BruteForceSolver`] — exact `O(N²)` pairwise forces; the reference
//!   solver for small systems and the test oracle for the tree.
//!
//! Both add the same explicit central-attractor term: a fixed, very massive
//! body at the origin that is never represented in the tree, evaluated with
//! the same softened inverse-square law.

use rayon::prelude::*;

use crate::simulation::integrator::{kick, kick_drift};
use crate::simulation::octree::{Octree, OctreeNode};
use crate::simulation::params::SimConstants;
use crate::simulation::states::{Body, NVec3};

/// Strategy interface for advancing the simulation by one step.
///
/// `solve` mutates positions, velocities, and accelerations in place; the
/// body count never changes. `dt` arrives pre-clamped by the engine.
pub trait Solver: Send {
    fn solve(&mut self, bodies: &mut [Body], dt: f64);

    /// The node array built during the last step, for visualization and
    /// testing. Empty for solvers that build no tree.
    fn nodes(&self) -> &[OctreeNode] {
        &[]
    }
}

/// Softened pull of the fixed central attractor at the origin, as a force on
/// a body of mass `m` at `pos`.
fn attractor_force(pos: NVec3, m: f64, c: &SimConstants) -> NVec3 {
    let dir = -pos;
    let dist2 = dir.norm_squared();
    let soft2 = c.attractor_softening * c.attractor_softening;
    let inv_r = (dist2 + soft2).sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    c.g * c.central_mass * m * inv_r3 * dir
}

// =========================================================================================
// Barnes-Hut solver
// =========================================================================================

/// Approximate gravity via a Barnes–Hut octree.
///
/// Per step: half-kick/drift, rebuild the tree from the new positions
/// (sequential), evaluate the force on every non-static body against the
/// frozen tree (parallel), second half-kick. The octree and the
/// position/mass scratch buffers are reused across steps.
pub struct BarnesHutSolver {
    constants: SimConstants,
    octree: Octree,
    positions: Vec<NVec3>,
    masses: Vec<f64>,
}

impl BarnesHutSolver {
    pub fn new(constants: SimConstants) -> Self {
        Self {
            constants,
            octree: Octree::new(),
            positions: Vec::new(),
            masses: Vec::new(),
        }
    }
}

impl Solver for BarnesHutSolver {
    fn solve(&mut self, bodies: &mut [Body], dt: f64) {
        if bodies.is_empty() {
            return;
        }

        kick_drift(bodies, dt);

        // Extract positions and masses into flat buffers for the build
        self.positions.clear();
        self.masses.clear();
        self.positions
            .par_extend(bodies.par_iter().map(|b| b.x));
        self.masses.par_extend(bodies.par_iter().map(|b| b.m));

        // Rebuild is single-threaded: insertion grows the node array and
        // updates shared ancestor aggregates
        self.octree.build(&self.positions, &self.masses);

        // The tree is frozen from here on; per-body queries are independent
        let c = &self.constants;
        let octree = &self.octree;
        bodies
            .par_iter_mut()
            .filter(|b| !b.is_static)
            .for_each(|b| {
                let mut force =
                    b.m * octree.calculate_force(b.x, c.g, c.softening, c.theta);
                force += attractor_force(b.x, b.m, c);
                b.a = force / b.m;
            });

        kick(bodies, dt);
    }

    fn nodes(&self) -> &[OctreeNode] {
        self.octree.nodes()
    }
}

// =========================================================================================
// Brute-force solver
// =========================================================================================

/// Exact pairwise gravity, `O(N²)`.
///
/// Same Verlet phases and constants as the tree solver; the force phase sums
/// over every other body directly. Positions and masses are snapshotted
/// before the sum so each body's update only writes its own slot.
pub struct BruteForceSolver {
    constants: SimConstants,
    snapshot: Vec<(NVec3, f64)>,
}

impl BruteForceSolver {
    pub fn new(constants: SimConstants) -> Self {
        Self {
            constants,
            snapshot: Vec::new(),
        }
    }
}

impl Solver for BruteForceSolver {
    fn solve(&mut self, bodies: &mut [Body], dt: f64) {
        if bodies.is_empty() {
            return;
        }

        kick_drift(bodies, dt);

        self.snapshot.clear();
        self.snapshot
            .par_extend(bodies.par_iter().map(|b| (b.x, b.m)));

        let c = &self.constants;
        let soft2 = c.softening * c.softening;
        let snapshot = &self.snapshot;
        bodies
            .par_iter_mut()
            .enumerate()
            .filter(|(_, b)| !b.is_static)
            .for_each(|(i, b)| {
                let mut force = NVec3::zeros();
                for (j, &(xj, mj)) in snapshot.iter().enumerate() {
                    if j == i {
                        continue;
                    }
                    let r = xj - b.x;
                    let d2 = r.norm_squared() + soft2;
                    let inv_r = d2.sqrt().recip();
                    let inv_r3 = inv_r * inv_r * inv_r;
                    force += c.g * mj * b.m * inv_r3 * r;
                }
                force += attractor_force(b.x, b.m, c);
                b.a = force / b.m;
            });

        kick(bodies, dt);
    }
}
