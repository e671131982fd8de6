//! Initial particle placement.
//!
//! Positions are kept inside the collision-safe interior of the cube so the
//! first tick starts from a contained state.

use glam::Vec3;
use rand::Rng;

use crate::params::SimParams;

/// Fill the cube interior with `count` particles on a jittered lattice.
///
/// Sites are spaced evenly enough that particles do not start overlapping,
/// so a resting set stays at rest until gravity moves it.
pub fn lattice_fill(params: &SimParams, count: usize) -> Vec<Vec3> {
    let mut rng = rand::thread_rng();
    let low = params.interior_min();
    let high = params.interior_max();

    let side = (count as f32).cbrt().ceil().max(1.0) as usize;
    let spacing = (high - low) / side as f32;

    let mut positions = Vec::with_capacity(count);
    'fill: for z in 0..side {
        for y in 0..side {
            for x in 0..side {
                if positions.len() == count {
                    break 'fill;
                }
                let site = Vec3::new(
                    low + (x as f32 + 0.5) * spacing,
                    low + (y as f32 + 0.5) * spacing,
                    low + (z as f32 + 0.5) * spacing,
                );
                let jitter = Vec3::new(
                    (rng.gen::<f32>() - 0.5) * spacing * 0.25,
                    (rng.gen::<f32>() - 0.5) * spacing * 0.25,
                    (rng.gen::<f32>() - 0.5) * spacing * 0.25,
                );
                positions.push((site + jitter).clamp(Vec3::splat(low), Vec3::splat(high)));
            }
        }
    }
    positions
}

/// Fill the cube interior with `count` uniformly random particles.
///
/// Overlaps are possible; the first collision pass separates them.
pub fn random_fill(params: &SimParams, count: usize) -> Vec<Vec3> {
    let mut rng = rand::thread_rng();
    let low = params.interior_min();
    let span = params.interior_max() - low;

    (0..count)
        .map(|_| {
            Vec3::new(
                low + rng.gen::<f32>() * span,
                low + rng.gen::<f32>() * span,
                low + rng.gen::<f32>() * span,
            )
        })
        .collect()
}
