//! Health probes for long-running simulations.

use glam::Vec3;

use crate::grid::UniformGrid;

/// True when every position and velocity component is finite.
pub fn all_finite(positions: &[Vec3], velocities: &[Vec3]) -> bool {
    positions.iter().all(|p| p.is_finite()) && velocities.iter().all(|v| v.is_finite())
}

/// Largest velocity magnitude in the set.
pub fn max_speed(velocities: &[Vec3]) -> f32 {
    velocities.iter().map(|v| v.length()).fold(0.0, f32::max)
}

/// Occupancy summary of the current grid contents.
#[derive(Clone, Copy, Debug, Default)]
pub struct GridStats {
    /// Cells holding at least one particle.
    pub occupied_cells: usize,
    /// Largest occupancy counter seen.
    pub max_occupancy: u32,
    /// Cells whose counter exceeded the slot capacity this tick; their
    /// excess particles are invisible to collision scans.
    pub overflowed_cells: usize,
}

/// Summarize the grid after a rebuild.
pub fn grid_stats(grid: &UniformGrid) -> GridStats {
    let capacity = grid.capacity() as u32;
    let mut stats = GridStats::default();

    for count in grid.occupancies() {
        if count > 0 {
            stats.occupied_cells += 1;
        }
        if count > stats.max_occupancy {
            stats.max_occupancy = count;
        }
        if count > capacity {
            stats.overflowed_cells += 1;
        }
    }
    stats
}
