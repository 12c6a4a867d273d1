//! Velocity–Verlet phase helpers for the N-body system.
//!
//! The full step is `Kick1/Drift → Rebuild → ForceEval → Kick2`; the rebuild
//! and force evaluation live in the solvers, while the two body-local phases
//! are shared here. Each body's update reads and writes only its own slot,
//! so both phases run data-parallel over the body slice. Static bodies are
//! skipped: they never move and keep a zero acceleration, but still
//! contribute mass to the force phase.

use rayon::prelude::*;

use crate::simulation::states::Body;

/// First Verlet half-step, using the acceleration stored on each body from
/// the previous step:
///
/// Drift: x_{n+1}   = x_n + v_n * dt + 1/2 * a_n * dt^2
/// Kick:  v_{n+1/2} = v_n + (1/2 * dt) * a_n
pub fn kick_drift(bodies: &mut [Body], dt: f64) {
    let half_dt = 0.5 * dt;
    bodies
        .par_iter_mut()
        .filter(|b| !b.is_static)
        .for_each(|b| {
            b.x += b.v * dt + half_dt * b.a * dt;
            b.v += half_dt * b.a;
        });
}

/// Second Verlet half-step, after accelerations have been re-evaluated at
/// the new positions:
///
/// Kick: v_{n+1} = v_{n+1/2} + (1/2 * dt) * a_{n+1}
pub fn kick(bodies: &mut [Body], dt: f64) {
    let half_dt = 0.5 * dt;
    bodies
        .par_iter_mut()
        .filter(|b| !b.is_static)
        .for_each(|b| {
            b.v += half_dt * b.a;
        });
}
