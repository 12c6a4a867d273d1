//! Build a fully-initialized simulation from configuration.
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle:
//! a [`SimulationEngine`] with its solver and bodies in place, plus the run
//! settings (`dt`, `t_end`) the stepping loop needs.
//!
//! Input validation lives here, at the boundary: body vectors must have
//! three components and masses must be positive before anything reaches the
//! hot path. A violated precondition is a configuration error, not a
//! runtime case, since a non-positive mass contaminates every aggregate in
//! the tree with NaN/Inf.

use anyhow::{bail, Result};

use crate::configuration::config::{BodyConfig, ScenarioConfig, SolverConfig};
use crate::simulation::engine::SimulationEngine;
use crate::simulation::galaxy::generate_galaxy;
use crate::simulation::params::SimConstants;
use crate::simulation::solver::{BarnesHutSolver, BruteForceSolver, Solver};
use crate::simulation::states::{Body, NVec3};

/// A ready-to-run scenario: engine plus run settings.
pub struct Scenario {
    pub engine: SimulationEngine,
    pub dt: f64, // step size per frame
    pub t_end: f64, // total simulated time
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        let p = &cfg.parameters;
        let constants = SimConstants {
            g: p.g,
            central_mass: p.central_mass,
            softening: p.softening,
            attractor_softening: p.attractor_softening,
            theta: cfg.engine.theta.unwrap_or(SimConstants::default().theta),
            max_dt: p.max_dt,
        };

        // Explicit bodies first, generated galaxy appended after
        let mut bodies: Vec<Body> = cfg
            .bodies
            .iter()
            .map(body_from_config)
            .collect::<Result<_>>()?;
        if let Some(galaxy) = &cfg.galaxy {
            bodies.extend(generate_galaxy(galaxy, &constants, p.seed));
        }
        for (i, b) in bodies.iter().enumerate() {
            if b.m <= 0.0 {
                bail!("body {i} has non-positive mass {}", b.m);
            }
        }

        let solver: Box<dyn Solver> = match cfg.engine.solver {
            SolverConfig::BarnesHut => Box::new(BarnesHutSolver::new(constants)),
            SolverConfig::BruteForce => Box::new(BruteForceSolver::new(constants)),
        };

        let mut engine = SimulationEngine::new(constants, solver);
        engine.set_bodies(bodies);

        Ok(Self {
            engine,
            dt: p.dt,
            t_end: p.t_end,
        })
    }
}

fn body_from_config(bc: &BodyConfig) -> Result<Body> {
    if bc.x.len() != 3 || bc.v.len() != 3 {
        bail!(
            "body vectors must have 3 components, got x: {}, v: {}",
            bc.x.len(),
            bc.v.len()
        );
    }
    Ok(Body {
        x: NVec3::new(bc.x[0], bc.x[1], bc.x[2]),
        v: NVec3::new(bc.v[0], bc.v[1], bc.v[2]),
        a: NVec3::zeros(),
        m: bc.m,
        is_static: bc.is_static,
    })
}
