//! Simulation engine facade.
//!
//! Owns the body store and the active force solver, and exposes the
//! in-process contract consumed by a renderer or an alternate backend:
//! `set_bodies`, `step`, and read-only views of bodies, tree nodes, and the
//! shared constants.

use crate::simulation::octree::OctreeNode;
use crate::simulation::params::SimConstants;
use crate::simulation::solver::Solver;
use crate::simulation::states::Body;

pub struct SimulationEngine {
    bodies: Vec<Body>,
    solver: Box<dyn Solver>,
    constants: SimConstants,
    t: f64, // elapsed simulation time
}

impl SimulationEngine {
    pub fn new(constants: SimConstants, solver: Box<dyn Solver>) -> Self {
        Self {
            bodies: Vec::new(),
            solver,
            constants,
            t: 0.0,
        }
    }

    /// Replace the current body state. Accelerations carry whatever the
    /// caller set (normally zero); the first step's drift uses them as-is.
    pub fn set_bodies(&mut self, bodies: Vec<Body>) {
        self.bodies = bodies;
    }

    /// Advance the simulation by one frame, mutating body state in place.
    ///
    /// `dt` is clamped to `constants.max_dt` so a frame hitch cannot blow up
    /// the integration. A non-positive `dt` or an empty body set is a no-op.
    pub fn step(&mut self, dt: f64) {
        if self.bodies.is_empty() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(self.constants.max_dt);
        self.solver.solve(&mut self.bodies, dt);
        self.t += dt;
    }

    /// Current body state, for rendering or cross-backend synchronization.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// The tree built by the last step (empty for non-tree solvers).
    pub fn nodes(&self) -> &[OctreeNode] {
        self.solver.nodes()
    }

    /// The constants every backend must agree on.
    pub fn constants(&self) -> &SimConstants {
        &self.constants
    }

    pub fn time(&self) -> f64 {
        self.t
    }
}
