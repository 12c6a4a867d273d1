//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario:
//!
//! - [`EngineConfig`]     – solver selection and Barnes–Hut options
//! - [`ParametersConfig`] – numerical parameters and physical constants
//! - [`GalaxyConfig`]     – spiral-disk generator settings (optional)
//! - [`BodyConfig`]       – explicitly listed bodies (optional)
//! - [`ScenarioConfig`]   – top-level wrapper loaded from YAML
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   solver: "barnes_hut"    # or "brute_force"
//!   theta: 0.5
//!
//! parameters:
//!   t_end: 10.0             # total simulation time
//!   dt: 0.016               # step size (clamped to max_dt)
//!   max_dt: 0.05
//!   seed: 42                # generator seed
//!   g: 1.0                  # gravitational constant
//!   central_mass: 100000.0  # fixed attractor at the origin
//!   softening: 0.5          # tree/pairwise force softening
//!   attractor_softening: 1.0
//!
//! galaxy:
//!   num_particles: 10000
//!   radius: 500.0
//!   scale_length: 166.7
//!   num_arms: 4
//!   arm_twist: 3.0
//!   arm_spread: 0.5
//!   disk_thickness: 10.0
//!   velocity_dispersion: 0.1
//!   particle_mass: 1.0
//!
//! bodies:
//!   - x: [ -0.5, 0.0, 0.0 ]
//!     v: [  0.0, 1.0, 0.0 ]
//!     m: 1.0
//!     is_static: false
//! ```
//!
//! The scenario builder maps this configuration into the runtime engine
//! representation.

use serde::Deserialize;

/// Which force solver the engine uses:
/// `solver: "barnes_hut"` or `solver: "brute_force"`.
#[derive(Deserialize, Debug, Clone)]
pub enum SolverConfig {
    #[serde(rename = "barnes_hut")] // octree approximation, O(N log N)
    BarnesHut,

    #[serde(rename = "brute_force")] // exact pairwise summation, O(N^2)
    BruteForce,
}

/// High-level engine configuration.
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub solver: SolverConfig, // force backend
    pub theta: Option<f64>, // opening threshold; engine default when absent
}

/// Global numerical and physical parameters for a scenario.
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub t_end: f64, // total simulated time
    pub dt: f64, // step size
    pub max_dt: f64, // step-size clamp
    pub seed: u64, // generator seed, makes runs reproducible
    pub g: f64, // gravitational constant
    pub central_mass: f64, // central-attractor mass
    pub softening: f64, // force-law softening
    pub attractor_softening: f64, // central-attractor softening
}

/// Spiral-galaxy generator settings.
#[derive(Deserialize, Debug, Clone)]
pub struct GalaxyConfig {
    pub num_particles: usize,
    pub radius: f64, // disk radius; sampled radii are clamped to this
    pub scale_length: f64, // exponential-disk scale length
    pub num_arms: usize, // number of spiral arms
    pub arm_twist: f64, // how far an arm winds from center to rim
    pub arm_spread: f64, // gaussian angular spread around each arm
    pub disk_thickness: f64, // gaussian sigma of the vertical profile
    pub velocity_dispersion: f64, // random velocity as a fraction of orbital speed
    pub particle_mass: f64,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            num_particles: 10_000,
            radius: 500.0,
            scale_length: 500.0 / 3.0,
            num_arms: 4,
            arm_twist: 3.0,
            arm_spread: 0.5,
            disk_thickness: 10.0,
            velocity_dispersion: 0.1,
            particle_mass: 1.0,
        }
    }
}

/// Initial state for one explicitly listed body.
#[derive(Deserialize, Debug)]
pub struct BodyConfig {
    pub x: Vec<f64>, // position, 3 components
    pub v: Vec<f64>, // velocity, 3 components
    pub m: f64, // mass, must be positive
    #[serde(default)]
    pub is_static: bool, // pinned in place, gravity source only
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub galaxy: Option<GalaxyConfig>, // generated bodies
    #[serde(default)]
    pub bodies: Vec<BodyConfig>, // explicit bodies, prepended to generated ones
}
