//! Discrete-element particle simulation in a bounded cube.
//!
//! Every tick rebuilds a uniform grid over the cube from scratch, resolves
//! pairwise collisions through neighbor-cell lookups only, and integrates
//! motion with boundary reflection. The particle position buffer is shared
//! with an external rendering collaborator; the simulation takes an
//! exclusive lease on it for the span of each tick.
//!
//! Velocities are double-buffered: the collision pass writes into a fresh
//! buffer while reading the resolved velocities of the previous tick, which
//! keeps every per-particle worker free of read/write hazards.
//!
//! # Example
//!
//! ```
//! use dem3d::{SharedPositions, SimParams, Simulation, Vec3};
//!
//! let params = SimParams::default();
//! let positions = SharedPositions::new(dem3d::spawn::lattice_fill(&params, 200));
//!
//! // The renderer keeps one handle, the simulation registers another.
//! let mut sim = Simulation::new(params, positions.clone()).unwrap();
//!
//! // Pull everything toward a corner of the cube for one tick.
//! sim.step(Vec3::new(2.0, 2.0, 2.0), 1.0 / 60.0).unwrap();
//! assert_eq!(sim.frame(), 1);
//! ```

pub mod collision;
pub mod constants;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod integrate;
pub mod math;
pub mod params;
pub mod positions;
pub mod spawn;

pub use error::Error;
pub use glam::Vec3;
pub use grid::UniformGrid;
pub use params::SimParams;
pub use positions::{PositionsLease, SharedPositions};

use rayon::prelude::*;

/// One simulation context: grid storage, velocity double-buffer, and the
/// registered handle to the render-shared position buffer.
///
/// Construction performs the whole one-time setup; afterwards the context
/// is in its steady state and [`Simulation::step`] runs the per-tick
/// pipeline. The particle count is fixed at registration and buffers live
/// until the context is dropped.
pub struct Simulation {
    params: SimParams,
    grid: UniformGrid,
    positions: SharedPositions,
    /// Resolved velocities, read by the next integration pass.
    velocities: Vec<Vec3>,
    /// Write-only target of the collision pass; swapped in after each tick.
    next_velocities: Vec<Vec3>,
    particle_count: usize,
    frame: u64,
}

impl Simulation {
    /// Validate `params`, allocate grid and velocity buffers, and register
    /// the shared position buffer.
    ///
    /// Velocities start at zero. Fails if the configuration is unusable or
    /// the buffer is empty; a context is never left half-initialized.
    pub fn new(params: SimParams, positions: SharedPositions) -> Result<Self, Error> {
        params.validate()?;
        let particle_count = positions.len()?;
        if particle_count == 0 {
            return Err(Error::NoParticles);
        }

        let grid = UniformGrid::new(&params);
        log::info!(
            "simulation context ready: {} particles, {}^3 cells of edge {}",
            particle_count,
            grid.cells_per_dim(),
            params.cell_edge()
        );

        Ok(Self {
            params,
            grid,
            positions,
            velocities: vec![Vec3::ZERO; particle_count],
            next_velocities: vec![Vec3::ZERO; particle_count],
            particle_count,
            frame: 0,
        })
    }

    /// Run one tick.
    ///
    /// Phases, each a parallel dispatch with a full barrier between them:
    /// take the position lease, clear the grid, integrate with the resolved
    /// velocities of the previous tick, rebuild the grid from the updated
    /// positions, resolve collisions into the next-velocity buffer, release
    /// the lease, swap velocity buffers.
    ///
    /// `attractor` sets the gravity direction: the normalized vector from
    /// the cube center toward it, or zero when the two coincide. `dt` is
    /// not clamped.
    pub fn step(&mut self, attractor: Vec3, dt: f32) -> Result<(), Error> {
        let mut lease = self.positions.lease()?;
        if lease.len() != self.particle_count {
            return Err(Error::ParticleCountMismatch {
                registered: self.particle_count,
                actual: lease.len(),
            });
        }

        self.grid.clear();

        let gravity_dir = (attractor - self.params.cube_center()).normalize_or_zero();

        integrate::integrate(&mut lease, &mut self.velocities, gravity_dir, dt, &self.params);

        // Rebuild after integration so every inserted position is inside
        // the cube.
        let grid = &self.grid;
        lease
            .par_iter()
            .enumerate()
            .with_min_len(self.params.dispatch_chunk)
            .for_each(|(index, &position)| grid.insert(index as u32, position));

        collision::resolve_collisions(
            &lease,
            &self.velocities,
            grid,
            &self.params,
            &mut self.next_velocities,
        );

        drop(lease);
        std::mem::swap(&mut self.velocities, &mut self.next_velocities);
        self.frame += 1;
        log::debug!("tick {} done, gravity dir {:?}", self.frame, gravity_dir);
        Ok(())
    }

    /// Configuration this context was built with.
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    /// Number of registered particles.
    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    /// Ticks completed so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Resolved velocities: the input of the next integration pass.
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Grid contents as of the last rebuild.
    pub fn grid(&self) -> &UniformGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer_is_rejected() {
        let result = Simulation::new(SimParams::default(), SharedPositions::new(Vec::new()));
        assert!(matches!(result, Err(Error::NoParticles)));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let params = SimParams {
            particle_radius: -1.0,
            ..SimParams::default()
        };
        let positions = SharedPositions::new(vec![Vec3::ONE]);
        assert!(matches!(
            Simulation::new(params, positions),
            Err(Error::InvalidParams(_))
        ));
    }

    #[test]
    fn first_tick_biases_velocity_before_moving() {
        let params = SimParams::default();
        let positions = SharedPositions::new(vec![Vec3::new(1.0, 1.0, 1.0)]);
        let mut sim = Simulation::new(params, positions.clone()).unwrap();

        // Attractor along +x from the center.
        sim.step(Vec3::new(10.0, 1.0, 1.0), 0.016).unwrap();

        // Integration used the zero-initialized velocities, so the particle
        // has not moved yet; the bias lands in the resolved buffer.
        let after_one = positions.snapshot().unwrap()[0];
        assert_eq!(after_one, Vec3::new(1.0, 1.0, 1.0));
        assert!((sim.velocities()[0].x - params.gravity_scale).abs() < 1e-7);

        // The second tick integrates with the biased velocity.
        sim.step(Vec3::new(10.0, 1.0, 1.0), 0.016).unwrap();
        let after_two = positions.snapshot().unwrap()[0];
        assert!(after_two.x > 1.0);
        assert_eq!(sim.frame(), 2);
    }

    #[test]
    fn centered_attractor_leaves_resting_set_at_rest() {
        let params = SimParams::default();
        let initial = spawn::lattice_fill(&params, 27);
        let positions = SharedPositions::new(initial.clone());
        let mut sim = Simulation::new(params, positions.clone()).unwrap();

        // Degenerate direction: attractor sits exactly at the cube center.
        sim.step(params.cube_center(), 0.016).unwrap();

        let after = positions.snapshot().unwrap();
        assert_eq!(after, initial, "no gravity and no contacts means no motion");
        assert!(sim.velocities().iter().all(|v| *v == Vec3::ZERO));
    }

    #[test]
    fn lease_is_released_after_each_tick() {
        let params = SimParams::default();
        let positions = SharedPositions::new(spawn::lattice_fill(&params, 8));
        let mut sim = Simulation::new(params, positions.clone()).unwrap();

        sim.step(Vec3::ZERO, 0.016).unwrap();
        // If step leaked its lease this would deadlock.
        let lease = positions.lease().unwrap();
        assert_eq!(lease.len(), 8);
    }
}
