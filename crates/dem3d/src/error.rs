//! Fatal simulation errors.
//!
//! There is no recoverable-error taxonomy in this domain: overflowing grid
//! cells and multi-contact overwrites are silent approximations handled in
//! [`crate::grid`] and [`crate::collision`]. What remains fatal is a context
//! that cannot be constructed or a shared-buffer contract violation.

/// Error type for simulation construction and per-tick contract checks.
#[derive(Debug)]
pub enum Error {
    /// Configuration rejected by [`crate::SimParams::validate`].
    InvalidParams(&'static str),
    /// The registered position buffer holds no particles.
    NoParticles,
    /// The shared position buffer changed length after registration.
    ParticleCountMismatch { registered: usize, actual: usize },
    /// A worker panicked while holding the position lease; the buffer may be
    /// half-integrated and must not be reused.
    BufferPoisoned,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidParams(reason) => write!(f, "invalid parameters: {}", reason),
            Error::NoParticles => write!(f, "position buffer holds no particles"),
            Error::ParticleCountMismatch { registered, actual } => write!(
                f,
                "position buffer length changed: registered {}, now {}",
                registered, actual
            ),
            Error::BufferPoisoned => write!(f, "position buffer poisoned by a panicked tick"),
        }
    }
}

impl std::error::Error for Error {}
