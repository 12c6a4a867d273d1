//! Core state types for the N-body simulation.
//!
//! Defines the 3D body struct and aggregate helpers over a body slice:
//! - `Body` using `NVec3` (position, velocity, acceleration, mass)
//! - `total_mass` / `center_of_mass` / `total_momentum` diagnostics
//!
//! The body array is owned by the engine and mutated in place every step.

use nalgebra::Vector3;
pub type NVec3 = Vector3<f64>;

#[derive(Debug, Clone)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub a: NVec3, // acceleration, stored between steps for the Verlet update
    pub m: f64, // mass
    pub is_static: bool, // excluded from integration, still exerts force
}

impl Body {
    /// A body at rest at `x` with mass `m`, zero velocity and acceleration.
    pub fn at_rest(x: NVec3, m: f64) -> Self {
        Self {
            x,
            v: NVec3::zeros(),
            a: NVec3::zeros(),
            m,
            is_static: false,
        }
    }
}

/// Sum of all body masses.
pub fn total_mass(bodies: &[Body]) -> f64 {
    bodies.iter().map(|b| b.m).sum()
}

/// Mass-weighted average position, or zero for an empty slice.
pub fn center_of_mass(bodies: &[Body]) -> NVec3 {
    let m = total_mass(bodies);
    if m == 0.0 {
        return NVec3::zeros();
    }
    bodies.iter().map(|b| b.x * b.m).sum::<NVec3>() / m
}

/// Total linear momentum `sum(m_i * v_i)`.
pub fn total_momentum(bodies: &[Body]) -> NVec3 {
    bodies.iter().map(|b| b.v * b.m).sum()
}
