//! Neighbor-cell collision resolution.
//!
//! One worker per particle scans the 27 cells around it and computes an
//! impulse response for any overlapping pair: a damped elasticity/inertia
//! blend of the relative velocity plus a spring push proportional to
//! penetration depth. The pass reads positions, velocities, and the built
//! grid, and writes only the next-velocity buffer, so workers never race.

use glam::Vec3;
use rayon::prelude::*;

use crate::grid::UniformGrid;
use crate::math::split_along;
use crate::params::SimParams;

/// Squared distance below which a pair is treated as coincident and skipped
/// (the contact normal is undefined there).
const COINCIDENT_EPSILON_SQ: f32 = 1e-12;

/// Resolve collisions for every particle into `next_velocities`.
///
/// Must run after the grid rebuild of the same tick has fully completed.
/// `next_velocities[i]` is `velocities[i]` plus the response of the last
/// overlapping neighbor in scan order, or unchanged when nothing overlaps.
pub fn resolve_collisions(
    positions: &[Vec3],
    velocities: &[Vec3],
    grid: &UniformGrid,
    params: &SimParams,
    next_velocities: &mut [Vec3],
) {
    next_velocities
        .par_iter_mut()
        .enumerate()
        .with_min_len(params.dispatch_chunk)
        .for_each(|(index, next)| {
            *next = velocities[index] + contact_response(index, positions, velocities, grid, params);
        });
}

/// Response of the last overlapping neighbor of `index`, or zero.
///
/// Simultaneous contacts overwrite each other rather than summing; with
/// several overlapping neighbors only the final one in scan order shapes
/// the result. Collision responses stay order-independent across workers
/// because nothing here mutates shared state.
fn contact_response(
    index: usize,
    positions: &[Vec3],
    velocities: &[Vec3],
    grid: &UniformGrid,
    params: &SimParams,
) -> Vec3 {
    let contact_dist = 2.0 * params.particle_radius;
    let contact_dist_sq = contact_dist * contact_dist;

    let position = positions[index];
    let velocity = velocities[index];
    let mut response = Vec3::ZERO;

    for neighbor in grid.neighbors(grid.cell_of(position)) {
        let neighbor = neighbor as usize;
        if neighbor == index {
            continue;
        }

        let diff = positions[neighbor] - position;
        let dist_sq = diff.length_squared();
        if dist_sq >= contact_dist_sq || dist_sq < COINCIDENT_EPSILON_SQ {
            continue;
        }

        let dist = dist_sq.sqrt();
        let normal = diff / dist;
        let v_rel = velocities[neighbor] - velocity;
        let (_, v_perp) = split_along(v_rel, normal);

        response = params.elasticity * v_rel + params.inertia * v_perp
            - params.damping * (contact_dist - dist) * normal;
    }

    response
}
