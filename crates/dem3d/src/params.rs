//! Simulation parameters and derived grid sizing.

use glam::Vec3;

use crate::constants::{
    CELL_CAPACITY, CUBE_MAX, CUBE_MIN, DAMPING, DISPATCH_CHUNK, ELASTICITY, GRAVITY_SCALE,
    GROUND_ELASTICITY, INERTIA, PARTICLE_RADIUS,
};
use crate::error::Error;

/// Configuration for one simulation context.
///
/// Defaults come from [`crate::constants`]. Geometry fields fix the grid
/// resolution at construction; changing them on a live context has no effect.
#[derive(Clone, Copy, Debug)]
pub struct SimParams {
    /// Lower corner of the cube on every axis (world units).
    pub cube_min: f32,
    /// Upper corner of the cube on every axis (world units).
    pub cube_max: f32,
    /// Particle radius (world units). Grid cell edge is twice this.
    pub particle_radius: f32,
    /// Slot capacity of one grid cell.
    pub cell_capacity: usize,
    /// Scale on the full relative velocity in the contact response.
    pub elasticity: f32,
    /// Scale on the perpendicular part of the relative velocity.
    pub inertia: f32,
    /// Velocity retained (and inverted) on boundary reflection.
    pub ground_elasticity: f32,
    /// Spring coefficient on penetration depth.
    pub damping: f32,
    /// Fixed velocity bias added along the attractor direction each tick.
    pub gravity_scale: f32,
    /// Minimum work items handed to one parallel worker.
    pub dispatch_chunk: usize,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            cube_min: CUBE_MIN,
            cube_max: CUBE_MAX,
            particle_radius: PARTICLE_RADIUS,
            cell_capacity: CELL_CAPACITY,
            elasticity: ELASTICITY,
            inertia: INERTIA,
            ground_elasticity: GROUND_ELASTICITY,
            damping: DAMPING,
            gravity_scale: GRAVITY_SCALE,
            dispatch_chunk: DISPATCH_CHUNK,
        }
    }
}

impl SimParams {
    /// Check that the configuration describes a usable simulation.
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.cube_min < self.cube_max) {
            return Err(Error::InvalidParams("cube_min must be below cube_max"));
        }
        if !(self.particle_radius > 0.0) {
            return Err(Error::InvalidParams("particle_radius must be positive"));
        }
        if 2.0 * self.particle_radius > self.cube_max - self.cube_min {
            return Err(Error::InvalidParams(
                "particle diameter exceeds the cube extent",
            ));
        }
        if self.cell_capacity == 0 {
            return Err(Error::InvalidParams("cell_capacity must be nonzero"));
        }
        if self.dispatch_chunk == 0 {
            return Err(Error::InvalidParams("dispatch_chunk must be nonzero"));
        }
        Ok(())
    }

    /// Edge length of one grid cell.
    #[inline]
    pub fn cell_edge(&self) -> f32 {
        2.0 * self.particle_radius
    }

    /// Number of grid cells along each axis.
    #[inline]
    pub fn cells_per_dim(&self) -> usize {
        ((self.cube_max - self.cube_min) / self.cell_edge()).ceil() as usize
    }

    /// Center of the simulation cube.
    #[inline]
    pub fn cube_center(&self) -> Vec3 {
        Vec3::splat(0.5 * (self.cube_min + self.cube_max))
    }

    /// Smallest coordinate a particle center may occupy.
    #[inline]
    pub fn interior_min(&self) -> f32 {
        self.cube_min + self.particle_radius
    }

    /// Largest coordinate a particle center may occupy.
    #[inline]
    pub fn interior_max(&self) -> f32 {
        self.cube_max - self.particle_radius
    }
}
