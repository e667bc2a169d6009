// Session state for one beaker run: the reaction counter, the active
// conjugate-base type, and the handles of the live population. All counter
// mutation funnels through here, either from engine reaction events or from
// the base-type switch.

use std::error::Error;
use std::fmt;

use crate::counter::{CountReadout, ReactionCounter};
use crate::engine::{EngineError, ParticleEngine, ParticleHandle, ReactionEvent};
use crate::ph;
use crate::species::Species;

#[derive(Debug)]
pub enum SwitchError {
    /// The control value is outside the closed species set; nothing changed.
    InvalidSelection(String),
    /// A particle could not be removed. The population is left empty and the
    /// prior base type stays committed.
    Teardown(EngineError),
    /// The engine could not build the new population. Same documented state
    /// as a teardown failure; recover with [`Session::repopulate`].
    Repopulate(EngineError),
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::InvalidSelection(msg) => write!(f, "{}", msg),
            SwitchError::Teardown(e) => write!(f, "population teardown failed: {}", e),
            SwitchError::Repopulate(e) => write!(f, "repopulation failed: {}", e),
        }
    }
}

impl Error for SwitchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SwitchError::InvalidSelection(_) => None,
            SwitchError::Teardown(e) | SwitchError::Repopulate(e) => Some(e),
        }
    }
}

pub struct Session {
    counter: ReactionCounter,
    base_type: Species,
    handles: Vec<ParticleHandle>,
    total_protons: usize,
    proton_capacity: usize,
}

impl Session {
    pub fn new(
        total_conjugate_bases: usize,
        total_protons: usize,
        proton_capacity: usize,
        base_type: Species,
    ) -> Self {
        debug_assert!(base_type.is_conjugate_base());
        Self {
            counter: ReactionCounter::new(total_conjugate_bases),
            base_type,
            handles: Vec::new(),
            total_protons,
            proton_capacity,
        }
    }

    /// Build the conjugate-base population for the active base type. The
    /// fresh particles all hold their proton, so the counter starts at the
    /// associated baseline. Also the recovery path after a failed switch.
    pub fn populate(&mut self, engine: &mut dyn ParticleEngine) -> Result<(), EngineError> {
        debug_assert!(self.handles.is_empty(), "populate over a live population");
        self.handles = engine.add_particles(self.base_type, self.counter.total())?;
        self.counter.reset();
        Ok(())
    }

    /// Add the fixed free-proton population. Called once at session start;
    /// protons are never torn down, so their handles are not retained.
    pub fn seed_protons(&mut self, engine: &mut dyn ParticleEngine) -> Result<(), EngineError> {
        engine.add_particles(Species::Proton, self.total_protons)?;
        Ok(())
    }

    /// Refill the population with the committed base type after a failed
    /// switch left the beaker empty.
    pub fn repopulate(&mut self, engine: &mut dyn ParticleEngine) -> Result<(), EngineError> {
        self.populate(engine)
    }

    /// Dispatch a reaction event from the engine. An event carrying a
    /// species other than the active one means the engine fired for a
    /// particle that should not exist; counting it would corrupt the
    /// invariant, so it is dropped with a warning.
    pub fn handle_event(&mut self, event: ReactionEvent) {
        if event.species() != self.base_type {
            log::warn!(
                "ignoring reaction event from inactive species {:?}",
                event.species()
            );
            return;
        }
        match event {
            ReactionEvent::ProtonReleasing { .. } => self.counter.on_proton_released(),
            ReactionEvent::ProtonCaptured { .. } => self.counter.on_proton_captured(),
        }
    }

    /// Switch the whole population to the base type named by the operator
    /// control. Runs teardown, counter reset, repopulation and commit in
    /// that order, synchronously, so no reaction event can interleave.
    ///
    /// On failure the prior base type stays committed and the beaker is left
    /// in the documented empty state: no live handles, counter at zero.
    pub fn select_base_type(
        &mut self,
        engine: &mut dyn ParticleEngine,
        value: &str,
    ) -> Result<(), SwitchError> {
        let new_type =
            Species::from_control_value(value).map_err(SwitchError::InvalidSelection)?;
        if new_type == self.base_type && !self.handles.is_empty() {
            // The control re-reported the active type; nothing to rebuild.
            return Ok(());
        }

        let teardown = self.teardown(engine);
        self.counter.reset();
        teardown?;

        self.handles = engine
            .add_particles(new_type, self.counter.total())
            .map_err(SwitchError::Repopulate)?;
        self.base_type = new_type;
        Ok(())
    }

    /// Remove every live particle, last slot down to first. Each slot is
    /// visited exactly once even when a removal fails; the engine owns the
    /// particle after removal, so the handle is dropped either way.
    fn teardown(&mut self, engine: &mut dyn ParticleEngine) -> Result<(), SwitchError> {
        let mut first_failure = None;
        for handle in self.handles.drain(..).rev() {
            if let Err(e) = engine.remove_particle(handle) {
                log::warn!("failed to remove particle {}: {}", handle.0, e);
                if first_failure.is_none() {
                    first_failure = Some(e);
                }
            }
        }
        match first_failure {
            Some(e) => Err(SwitchError::Teardown(e)),
            None => Ok(()),
        }
    }

    pub fn subscribe(&mut self, readout: Box<dyn CountReadout>) {
        self.counter.subscribe(readout);
    }

    /// `(dissociated, associated)` for the particle table.
    pub fn render_values(&self) -> (usize, usize) {
        self.counter.render_values()
    }

    /// The pH line, two decimal places. The free-proton count is fixed for
    /// the session, so this is constant over a run.
    pub fn render_ph(&self) -> String {
        ph::format_ph(ph::compute_ph(self.total_protons, self.proton_capacity))
    }

    pub fn base_type(&self) -> Species {
        self.base_type
    }

    /// Number of live conjugate-base particles; zero after a failed switch.
    pub fn population(&self) -> usize {
        self.handles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubEngine {
        next_handle: u64,
        live: Vec<(ParticleHandle, Species)>,
        removed: Vec<ParticleHandle>,
        fail_adds: bool,
        fail_removals: bool,
    }

    impl StubEngine {
        fn new() -> Self {
            Self {
                next_handle: 0,
                live: Vec::new(),
                removed: Vec::new(),
                fail_adds: false,
                fail_removals: false,
            }
        }

        fn live_of(&self, species: Species) -> usize {
            self.live.iter().filter(|(_, s)| *s == species).count()
        }
    }

    impl ParticleEngine for StubEngine {
        fn add_particles(
            &mut self,
            species: Species,
            count: usize,
        ) -> Result<Vec<ParticleHandle>, EngineError> {
            if self.fail_adds {
                return Err(EngineError::OutOfCapacity {
                    requested: count,
                    available: 0,
                });
            }
            let mut handles = Vec::with_capacity(count);
            for _ in 0..count {
                let handle = ParticleHandle(self.next_handle);
                self.next_handle += 1;
                self.live.push((handle, species));
                handles.push(handle);
            }
            Ok(handles)
        }

        fn remove_particle(&mut self, handle: ParticleHandle) -> Result<(), EngineError> {
            if self.fail_removals {
                return Err(EngineError::UnknownHandle(handle));
            }
            match self.live.iter().position(|(h, _)| *h == handle) {
                Some(i) => {
                    self.live.remove(i);
                    self.removed.push(handle);
                    Ok(())
                }
                None => Err(EngineError::UnknownHandle(handle)),
            }
        }
    }

    fn strong_session(engine: &mut StubEngine) -> Session {
        let mut session = Session::new(10, 10, 128, Species::StrongConjugateBase);
        session.populate(engine).unwrap();
        session
    }

    fn release() -> ReactionEvent {
        ReactionEvent::ProtonReleasing {
            species: Species::StrongConjugateBase,
        }
    }

    fn capture() -> ReactionEvent {
        ReactionEvent::ProtonCaptured {
            species: Species::StrongConjugateBase,
        }
    }

    #[test]
    fn reactions_then_switch_follow_the_table() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        for _ in 0..3 {
            session.handle_event(release());
        }
        assert_eq!(session.render_values(), (3, 7));

        session.handle_event(capture());
        assert_eq!(session.render_values(), (2, 8));

        session
            .select_base_type(&mut engine, "WeakConjugateBase")
            .unwrap();
        assert_eq!(session.render_values(), (0, 10));
        assert_eq!(session.base_type(), Species::WeakConjugateBase);
        assert_eq!(session.population(), 10);
        // All ten prior particles went back to the engine.
        assert_eq!(engine.removed.len(), 10);
        assert_eq!(engine.live_of(Species::StrongConjugateBase), 0);
        assert_eq!(engine.live_of(Species::WeakConjugateBase), 10);
    }

    #[test]
    fn invalid_selection_changes_nothing() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);
        session.handle_event(release());

        let err = session.select_base_type(&mut engine, "Unknown").unwrap_err();
        assert!(matches!(err, SwitchError::InvalidSelection(_)));
        assert_eq!(session.render_values(), (1, 9));
        assert_eq!(session.base_type(), Species::StrongConjugateBase);
        assert_eq!(session.population(), 10);
        assert!(engine.removed.is_empty());
    }

    #[test]
    fn switch_round_trip_restores_session_start() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        session
            .select_base_type(&mut engine, "WeakConjugateBase")
            .unwrap();
        session
            .select_base_type(&mut engine, "StrongConjugateBase")
            .unwrap();
        assert_eq!(session.render_values(), (0, 10));
        assert_eq!(session.base_type(), Species::StrongConjugateBase);
        assert_eq!(session.population(), 10);
    }

    #[test]
    fn reselecting_the_active_type_is_a_no_op() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        session
            .select_base_type(&mut engine, "StrongConjugateBase")
            .unwrap();
        assert!(engine.removed.is_empty());
        assert_eq!(session.population(), 10);
    }

    #[test]
    fn failed_repopulation_does_not_commit() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        engine.fail_adds = true;
        let err = session
            .select_base_type(&mut engine, "WeakConjugateBase")
            .unwrap_err();
        assert!(matches!(err, SwitchError::Repopulate(_)));
        assert_eq!(session.base_type(), Species::StrongConjugateBase);
        assert_eq!(session.population(), 0);
        assert_eq!(session.render_values(), (0, 10));

        engine.fail_adds = false;
        session.repopulate(&mut engine).unwrap();
        assert_eq!(session.population(), 10);
        assert_eq!(session.base_type(), Species::StrongConjugateBase);
        assert_eq!(engine.live_of(Species::StrongConjugateBase), 10);
    }

    #[test]
    fn failed_teardown_still_visits_every_slot() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        engine.fail_removals = true;
        let err = session
            .select_base_type(&mut engine, "WeakConjugateBase")
            .unwrap_err();
        assert!(matches!(err, SwitchError::Teardown(_)));
        assert_eq!(session.base_type(), Species::StrongConjugateBase);
        assert_eq!(session.population(), 0);
        assert_eq!(session.render_values(), (0, 10));
    }

    #[test]
    fn events_from_the_inactive_species_are_ignored() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        session.handle_event(ReactionEvent::ProtonReleasing {
            species: Species::WeakConjugateBase,
        });
        assert_eq!(session.render_values(), (0, 10));
    }

    #[test]
    fn protons_are_seeded_but_not_tracked() {
        let mut engine = StubEngine::new();
        let mut session = strong_session(&mut engine);

        session.seed_protons(&mut engine).unwrap();
        assert_eq!(engine.live_of(Species::Proton), 10);
        assert_eq!(session.population(), 10);
    }

    #[test]
    fn ph_line_is_fixed_by_the_proton_count() {
        let mut engine = StubEngine::new();
        let session = strong_session(&mut engine);
        assert_eq!(session.render_ph(), "11.81");
    }
}
