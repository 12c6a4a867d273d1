//! Spiral-galaxy initial conditions.
//!
//! Samples a rotating exponential disk around the engine's central
//! attractor: radius by inverse-transform sampling, angle from a randomly
//! chosen spiral arm plus Gaussian spread, Gaussian vertical profile, and a
//! near-Keplerian orbital velocity with anisotropic dispersion. Generation
//! is deterministic for a given seed.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

use crate::configuration::config::GalaxyConfig;
use crate::simulation::params::SimConstants;
use crate::simulation::states::{Body, NVec3};

/// Generate `cfg.num_particles` disk bodies orbiting the central attractor.
///
/// Orbital speeds use the same `g`, `central_mass`, and attractor softening
/// the solvers use, so a freshly generated disk starts close to equilibrium.
/// All bodies are non-static with mass `cfg.particle_mass`.
pub fn generate_galaxy(cfg: &GalaxyConfig, constants: &SimConstants, seed: u64) -> Vec<Body> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut bodies = Vec::with_capacity(cfg.num_particles);

    let num_arms = cfg.num_arms.max(1);
    let angle_step = TAU / num_arms as f64;

    for _ in 0..cfg.num_particles {
        // Radius: exponential disk via inverse transform, clamped to the rim
        let u: f64 = rng.gen();
        let r = (-cfg.scale_length * (1.0 - u + 1e-6).ln()).min(cfg.radius);

        // Angle: pick an arm, wind it with radius, add gaussian spread
        let arm = rng.gen_range(0..num_arms) as f64;
        let spiral_angle = cfg.arm_twist * (r / cfg.radius);
        let noise: f64 = rng.sample::<f64, _>(StandardNormal) * cfg.arm_spread;
        let angle = arm * angle_step + spiral_angle + noise;

        let height: f64 = rng.sample::<f64, _>(StandardNormal) * cfg.disk_thickness;
        let x = NVec3::new(r * angle.cos(), height, r * angle.sin());

        // Circular-orbit speed about the softened central attractor
        let dist = x.norm();
        let speed =
            (constants.g * constants.central_mass / (dist + constants.attractor_softening)).sqrt();

        // Tangent direction in the disk plane; near the center orbits are
        // disordered, so draw a random in-plane direction instead
        let up = NVec3::new(0.0, 1.0, 0.0);
        let tangent = if dist < 0.01 {
            NVec3::new(
                rng.sample::<f64, _>(StandardNormal),
                0.0,
                rng.sample::<f64, _>(StandardNormal),
            )
            .normalize()
        } else {
            up.cross(&x).normalize()
        };

        let mut v = tangent * speed;
        let dispersion = cfg.velocity_dispersion * speed;
        v.x += rng.sample::<f64, _>(StandardNormal) * dispersion;
        v.y += rng.sample::<f64, _>(StandardNormal) * dispersion * 0.5; // thinner vertically
        v.z += rng.sample::<f64, _>(StandardNormal) * dispersion;

        let mut body = Body::at_rest(x, cfg.particle_mass);
        body.v = v;
        bodies.push(body);
    }

    bodies
}
