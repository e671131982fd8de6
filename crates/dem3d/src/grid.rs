//! Uniform grid acceleration structure for neighbor lookups.
//!
//! The cube is partitioned into cubic cells one particle diameter wide, so
//! any two overlapping particles are at most one cell apart on each axis.
//! Each cell owns a fixed-capacity slot array of particle indices and an
//! occupancy counter. The structure is rebuilt from scratch every tick:
//! a parallel clear pass (one worker per cell), then a parallel insert pass
//! (one worker per particle) contending on the counters with atomic
//! fetch-and-increment.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use glam::Vec3;
use rayon::prelude::*;

use crate::params::SimParams;

/// Sentinel marking an unused slot.
pub const EMPTY_SLOT: u32 = u32::MAX;

/// Set once the out-of-range clamp has fired, to keep the log readable.
static CLAMP_WARNED: AtomicBool = AtomicBool::new(false);

/// Fixed-resolution spatial grid over the simulation cube.
///
/// Allocated once per context and never resized. Counters and slots carry
/// no state across ticks; [`UniformGrid::clear`] resets both.
pub struct UniformGrid {
    cells_per_dim: usize,
    cell_edge: f32,
    origin: f32,
    capacity: usize,
    counts: Vec<AtomicU32>,
    slots: Vec<AtomicU32>,
}

impl UniformGrid {
    /// Allocate the grid for the given configuration.
    pub fn new(params: &SimParams) -> Self {
        let cells_per_dim = params.cells_per_dim();
        let cell_count = cells_per_dim * cells_per_dim * cells_per_dim;
        let capacity = params.cell_capacity;

        Self {
            cells_per_dim,
            cell_edge: params.cell_edge(),
            origin: params.cube_min,
            capacity,
            counts: (0..cell_count).map(|_| AtomicU32::new(0)).collect(),
            slots: (0..cell_count * capacity)
                .map(|_| AtomicU32::new(EMPTY_SLOT))
                .collect(),
        }
    }

    /// Cells along each axis.
    #[inline]
    pub fn cells_per_dim(&self) -> usize {
        self.cells_per_dim
    }

    /// Total cell count.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.counts.len()
    }

    /// Slot capacity of one cell.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Cell coordinates containing `position`: the min-relative coordinate
    /// floor-divided by the cell edge on each axis.
    ///
    /// The integrator guarantees positions stay inside the cube, so the
    /// clamp below never fires in a healthy pipeline; it guards against an
    /// external writer bypassing the integrator, which would otherwise make
    /// the cell index undefined.
    pub fn cell_of(&self, position: Vec3) -> (i32, i32, i32) {
        let scaled = (position - Vec3::splat(self.origin)) / self.cell_edge;
        let max = self.cells_per_dim as i32 - 1;
        let x = scaled.x.floor() as i32;
        let y = scaled.y.floor() as i32;
        let z = scaled.z.floor() as i32;

        if (x < 0 || x > max || y < 0 || y > max || z < 0 || z > max)
            && !CLAMP_WARNED.swap(true, Ordering::Relaxed)
        {
            log::warn!(
                "position {:?} outside the cube; cell index clamped (reported once)",
                position
            );
        }

        (x.clamp(0, max), y.clamp(0, max), z.clamp(0, max))
    }

    /// Whether cell coordinates are within the grid.
    #[inline]
    pub fn cell_in_bounds(&self, cell: (i32, i32, i32)) -> bool {
        let dim = self.cells_per_dim as i32;
        let (x, y, z) = cell;
        x >= 0 && x < dim && y >= 0 && y < dim && z >= 0 && z < dim
    }

    #[inline]
    fn cell_index(&self, cell: (i32, i32, i32)) -> usize {
        debug_assert!(self.cell_in_bounds(cell));
        let (x, y, z) = cell;
        (z as usize * self.cells_per_dim + y as usize) * self.cells_per_dim + x as usize
    }

    /// Reset every occupancy counter and slot. One parallel worker per
    /// cell; must complete before any insert of the tick (the caller's
    /// phase barrier provides the ordering). Idempotent.
    pub fn clear(&mut self) {
        let capacity = self.capacity;
        self.counts
            .par_iter_mut()
            .zip(self.slots.par_chunks_mut(capacity))
            .for_each(|(count, slots)| {
                *count.get_mut() = 0;
                for slot in slots {
                    *slot.get_mut() = EMPTY_SLOT;
                }
            });
    }

    /// Register `index` in the cell containing `position`.
    ///
    /// Safe to call from many workers at once: the occupancy counter is
    /// bumped with an atomic fetch-and-increment, and each pre-increment
    /// value below capacity claims a distinct slot. Particles arriving
    /// after the cell is full keep counting but get no slot, so they are
    /// invisible to collision scans until the next rebuild.
    pub fn insert(&self, index: u32, position: Vec3) {
        let cell = self.cell_index(self.cell_of(position));
        let claimed = self.counts[cell].fetch_add(1, Ordering::Relaxed) as usize;
        if claimed < self.capacity {
            self.slots[cell * self.capacity + claimed].store(index, Ordering::Relaxed);
        }
    }

    /// Raw occupancy counter of a cell. May exceed [`Self::capacity`] when
    /// the cell overflowed this tick.
    pub fn occupancy(&self, cell: (i32, i32, i32)) -> u32 {
        self.counts[self.cell_index(cell)].load(Ordering::Relaxed)
    }

    /// Particle indices stored in one cell, in insertion order. Visits the
    /// first `min(occupancy, capacity)` slots and skips the empty sentinel.
    pub fn cell_slots(&self, cell: (i32, i32, i32)) -> impl Iterator<Item = u32> + '_ {
        let index = self.cell_index(cell);
        let filled = (self.counts[index].load(Ordering::Relaxed) as usize).min(self.capacity);
        self.slots[index * self.capacity..index * self.capacity + filled]
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .filter(|&particle| particle != EMPTY_SLOT)
    }

    /// Particle indices in the 3x3x3 block of cells centered on `center`,
    /// skipping cells outside the grid on any axis. Lazy; recomputed per
    /// collision scan.
    pub fn neighbors(&self, center: (i32, i32, i32)) -> impl Iterator<Item = u32> + '_ {
        let (cx, cy, cz) = center;
        (-1i32..=1)
            .flat_map(move |dz| (-1i32..=1).map(move |dy| (dy, dz)))
            .flat_map(move |(dy, dz)| {
                (-1i32..=1).map(move |dx| (cx + dx, cy + dy, cz + dz))
            })
            .filter(move |&cell| self.cell_in_bounds(cell))
            .flat_map(move |cell| self.cell_slots(cell))
    }

    /// Occupancy counters of every cell, for diagnostics.
    pub fn occupancies(&self) -> impl Iterator<Item = u32> + '_ {
        self.counts.iter().map(|count| count.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_grid(capacity: usize) -> UniformGrid {
        UniformGrid::new(&SimParams {
            cell_capacity: capacity,
            ..SimParams::default()
        })
    }

    #[test]
    fn cell_of_floor_divides_by_diameter() {
        let grid = test_grid(8);
        // Default cube [0, 2], radius 0.05, cell edge 0.1.
        assert_eq!(grid.cells_per_dim(), 20);
        assert_eq!(grid.cell_of(Vec3::new(0.25, 0.05, 1.95)), (2, 0, 19));
        assert_eq!(grid.cell_of(Vec3::ZERO), (0, 0, 0));
    }

    #[test]
    fn cell_of_clamps_out_of_range_positions() {
        let grid = test_grid(8);
        assert_eq!(grid.cell_of(Vec3::new(-5.0, 1.0, 1.0)), (0, 10, 10));
        assert_eq!(grid.cell_of(Vec3::new(1.0, 99.0, 1.0)), (10, 19, 10));
    }

    #[test]
    fn insert_places_particle_in_its_own_cell() {
        let grid = test_grid(8);
        let position = Vec3::new(0.42, 1.13, 0.77);
        grid.insert(7, position);

        let cell = grid.cell_of(position);
        assert_eq!(grid.occupancy(cell), 1);
        let stored: Vec<u32> = grid.cell_slots(cell).collect();
        assert_eq!(stored, vec![7]);
    }

    #[test]
    fn overflow_keeps_counting_but_drops_slots() {
        let grid = test_grid(2);
        let position = Vec3::new(1.0, 1.0, 1.0);
        for index in 0..5 {
            grid.insert(index, position);
        }

        let cell = grid.cell_of(position);
        assert_eq!(grid.occupancy(cell), 5, "counter must keep counting");
        let stored: Vec<u32> = grid.cell_slots(cell).collect();
        assert_eq!(stored, vec![0, 1], "only the first capacity inserts get slots");
    }

    #[test]
    fn clear_is_idempotent() {
        let mut grid = test_grid(4);
        grid.insert(0, Vec3::new(0.5, 0.5, 0.5));
        grid.insert(1, Vec3::new(0.5, 0.5, 0.5));

        grid.clear();
        grid.clear();

        assert!(grid.occupancies().all(|count| count == 0));
        let cell = grid.cell_of(Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(grid.cell_slots(cell).count(), 0);
        assert_eq!(grid.neighbors(cell).count(), 0);
    }

    #[test]
    fn neighbors_skips_cells_outside_the_grid() {
        let grid = test_grid(8);
        // Corner particle: the 3x3x3 block around (0,0,0) has only 8 cells
        // in range, and iterating it must not panic.
        grid.insert(3, Vec3::new(0.05, 0.05, 0.05));
        let found: Vec<u32> = grid.neighbors((0, 0, 0)).collect();
        assert_eq!(found, vec![3]);
    }

    #[test]
    fn neighbors_sees_adjacent_cells_only() {
        let grid = test_grid(8);
        grid.insert(0, Vec3::new(1.05, 1.05, 1.05)); // cell (10, 10, 10)
        grid.insert(1, Vec3::new(1.15, 1.05, 1.05)); // cell (11, 10, 10)
        grid.insert(2, Vec3::new(1.55, 1.05, 1.05)); // cell (15, 10, 10), far

        let mut found: Vec<u32> = grid.neighbors((10, 10, 10)).collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn parallel_inserts_into_one_cell_lose_nothing() {
        use rayon::prelude::*;

        let grid = test_grid(64);
        let position = Vec3::new(1.0, 1.0, 1.0);
        (0..64u32).into_par_iter().for_each(|index| {
            grid.insert(index, position);
        });

        let cell = grid.cell_of(position);
        assert_eq!(grid.occupancy(cell), 64);
        let mut stored: Vec<u32> = grid.cell_slots(cell).collect();
        stored.sort_unstable();
        assert_eq!(stored, (0..64).collect::<Vec<u32>>());
    }
}
