pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Body, NVec3, center_of_mass, total_mass, total_momentum};
pub use simulation::params::SimConstants;
pub use simulation::octree::{Octree, OctreeNode, MAX_DEPTH};
pub use simulation::solver::{BarnesHutSolver, BruteForceSolver, Solver};
pub use simulation::engine::SimulationEngine;
pub use simulation::galaxy::generate_galaxy;
pub use simulation::scenario::Scenario;

pub use configuration::config::{
    BodyConfig, EngineConfig, GalaxyConfig, ParametersConfig, ScenarioConfig, SolverConfig,
};

pub use benchmark::benchmark::{bench_solvers, bench_step_curve};
