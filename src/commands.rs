// Handles operator commands against the session. A command either succeeds
// or leaves the session in the documented recoverable state; failures are
// logged rather than propagated, since the display simply keeps reflecting
// whatever counts the session holds.

use crate::engine::ParticleEngine;
use crate::session::Session;

pub enum SimCommand {
    /// The base-type control changed; carries the raw control value, which
    /// is validated against the closed species set before anything mutates.
    SelectBaseType { value: String },
    /// Rebuild the population after a failed switch left the beaker empty.
    Repopulate,
}

/// Process a single SimCommand.
pub fn process_command(cmd: SimCommand, session: &mut Session, engine: &mut dyn ParticleEngine) {
    match cmd {
        SimCommand::SelectBaseType { value } => {
            if let Err(e) = session.select_base_type(engine, &value) {
                log::warn!("base type switch rejected: {}", e);
            }
        }
        SimCommand::Repopulate => {
            if let Err(e) = session.repopulate(engine) {
                log::error!("repopulation failed, beaker stays empty: {}", e);
            }
        }
    }
}
