//! Default configuration for the cube simulation.
//!
//! Every value here is also carried on [`SimParams`](crate::SimParams), so
//! callers can override geometry and response coefficients per context.
//! The grid resolution is derived from extent and radius at construction
//! and never changes afterwards.

// =============================================================================
// GEOMETRY
// =============================================================================

/// Lower corner of the simulation cube on every axis (world units).
pub const CUBE_MIN: f32 = 0.0;

/// Upper corner of the simulation cube on every axis (world units).
pub const CUBE_MAX: f32 = 2.0;

/// Particle radius (world units). Cell edge length is twice this.
pub const PARTICLE_RADIUS: f32 = 0.05;

/// Slot capacity of one grid cell. Particles past this count still bump the
/// occupancy counter but are invisible to collision scans for the tick.
pub const CELL_CAPACITY: usize = 8;

// =============================================================================
// COLLISION RESPONSE
// =============================================================================

/// Scale on the full relative velocity in the contact response.
pub const ELASTICITY: f32 = 0.5;

/// Scale on the perpendicular (tangential) part of the relative velocity.
pub const INERTIA: f32 = 0.4;

/// Spring coefficient on penetration depth, pushing overlapping pairs apart.
pub const DAMPING: f32 = 10.0;

/// Velocity retained (and inverted) when a particle hits a cube face.
pub const GROUND_ELASTICITY: f32 = 0.5;

// =============================================================================
// FORCES / DISPATCH
// =============================================================================

/// Fixed velocity bias added along the attractor direction each tick.
pub const GRAVITY_SCALE: f32 = 0.005;

/// Minimum particles (or cells) handed to one parallel worker.
pub const DISPATCH_CHUNK: usize = 64;
