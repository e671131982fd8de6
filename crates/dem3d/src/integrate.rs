//! Motion integration and boundary reflection.
//!
//! One worker per particle: advance the position by the resolved velocity
//! of the previous tick, add the attractor gravity bias, then reflect off
//! the six cube faces. The containment clamp is unconditional; the grid
//! rebuild that follows relies on every position being inside the cube.

use glam::Vec3;
use rayon::prelude::*;

use crate::params::SimParams;

/// Advance all particles by `dt` and enforce the cube boundaries.
///
/// `gravity_dir` is expected to be a unit vector or zero; the bias added to
/// each velocity is `gravity_dir * params.gravity_scale` regardless of `dt`.
/// After this call every position lies within
/// `[cube_min + radius, cube_max - radius]` on every axis.
pub fn integrate(
    positions: &mut [Vec3],
    velocities: &mut [Vec3],
    gravity_dir: Vec3,
    dt: f32,
    params: &SimParams,
) {
    let low = params.interior_min();
    let high = params.interior_max();
    let restitution = params.ground_elasticity;
    let bias = gravity_dir * params.gravity_scale;

    positions
        .par_iter_mut()
        .zip(velocities.par_iter_mut())
        .with_min_len(params.dispatch_chunk)
        .for_each(|(position, velocity)| {
            *position += *velocity * dt;
            *velocity += bias;

            if position.x < low {
                position.x = low;
                velocity.x = -restitution * velocity.x;
            } else if position.x > high {
                position.x = high;
                velocity.x = -restitution * velocity.x;
            }
            if position.y < low {
                position.y = low;
                velocity.y = -restitution * velocity.y;
            } else if position.y > high {
                position.y = high;
                velocity.y = -restitution * velocity.y;
            }
            if position.z < low {
                position.z = low;
                velocity.z = -restitution * velocity.z;
            } else if position.z > high {
                position.z = high;
                velocity.z = -restitution * velocity.z;
            }
        });
}
