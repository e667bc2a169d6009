// The seam between this crate and the particle simulation engine.
// The engine owns every particle; the session only holds opaque handles and
// receives reaction events the engine fires while stepping.

use std::error::Error;
use std::fmt;

use crate::species::Species;

/// Opaque reference to an engine-owned particle. Removing the particle
/// returns ownership to the engine; the handle must not be reused afterwards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ParticleHandle(pub u64);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EngineError {
    OutOfCapacity { requested: usize, available: usize },
    UnknownHandle(ParticleHandle),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::OutOfCapacity {
                requested,
                available,
            } => write!(
                f,
                "cannot add {} particles, only {} slots free",
                requested, available
            ),
            EngineError::UnknownHandle(handle) => {
                write!(f, "no particle with handle {}", handle.0)
            }
        }
    }
}

impl Error for EngineError {}

/// Commands the session issues to the engine.
pub trait ParticleEngine {
    /// Add `count` particles of one species, returning their handles.
    fn add_particles(
        &mut self,
        species: Species,
        count: usize,
    ) -> Result<Vec<ParticleHandle>, EngineError>;

    /// Remove one particle, transferring it back to the engine.
    fn remove_particle(&mut self, handle: ParticleHandle) -> Result<(), EngineError>;
}

/// Reaction events the engine pushes into the session while it steps.
///
/// The two moments are deliberately asymmetric: `ProtonReleasing` fires
/// before the engine flips the particle's internal state ("about to stop
/// being an acid"), `ProtonCaptured` fires after it ("has just become an
/// acid again"). Handlers must be invoked exactly once per transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReactionEvent {
    ProtonReleasing { species: Species },
    ProtonCaptured { species: Species },
}

impl ReactionEvent {
    pub fn species(self) -> Species {
        match self {
            ReactionEvent::ProtonReleasing { species } => species,
            ReactionEvent::ProtonCaptured { species } => species,
        }
    }
}
