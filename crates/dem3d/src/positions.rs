//! The render-shared position buffer and its exclusive lease.
//!
//! The position array is owned jointly by the simulation and an external
//! rendering collaborator. Cloning a [`SharedPositions`] handle is the
//! one-time registration step; [`SharedPositions::lease`] is the per-tick
//! bracket. While a [`PositionsLease`] is alive no other holder can touch
//! the buffer, and dropping it releases the bracket on every exit path.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec3;

use crate::error::Error;

/// Clonable handle over the shared particle position array.
///
/// The buffer is allocated once by whoever creates the first handle and is
/// never resized while registered with a simulation context.
#[derive(Clone)]
pub struct SharedPositions {
    inner: Arc<Mutex<Vec<Vec3>>>,
}

impl SharedPositions {
    /// Wrap an externally initialized position array.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(positions)),
        }
    }

    /// Number of particles in the buffer.
    pub fn len(&self) -> Result<usize, Error> {
        Ok(self.lock()?.len())
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> Result<bool, Error> {
        Ok(self.lock()?.is_empty())
    }

    /// Take exclusive access for the duration of a tick. Blocks while any
    /// other holder (typically the renderer) is reading the buffer.
    pub fn lease(&self) -> Result<PositionsLease<'_>, Error> {
        Ok(PositionsLease { guard: self.lock()? })
    }

    /// Copy the current contents. Intended for the rendering side and for
    /// tests; takes and releases the lease internally.
    pub fn snapshot(&self) -> Result<Vec<Vec3>, Error> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Vec3>>, Error> {
        self.inner.lock().map_err(|_| Error::BufferPoisoned)
    }
}

/// Scoped exclusive access to the shared positions.
///
/// Held across the clear/integrate/rebuild/collide phases of one tick and
/// released on drop.
pub struct PositionsLease<'a> {
    guard: MutexGuard<'a, Vec<Vec3>>,
}

impl Deref for PositionsLease<'_> {
    type Target = [Vec3];

    fn deref(&self) -> &[Vec3] {
        &self.guard
    }
}

impl DerefMut for PositionsLease<'_> {
    fn deref_mut(&mut self) -> &mut [Vec3] {
        &mut self.guard
    }
}
