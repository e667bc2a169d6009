// Headless driver: wires the session to a deterministic in-process engine
// and prints the particle table and pH line to stdout. The real particle
// engine lives outside this crate; the scripted one here exists so a run
// (and the integration tests) can exercise the full event path.

use crate::commands::{process_command, SimCommand};
use crate::config::{self, SessionConfig};
use crate::counter::CountReadout;
use crate::engine::{EngineError, ParticleEngine, ParticleHandle, ReactionEvent};
use crate::session::Session;
use crate::species::Species;

struct EngineParticle {
    handle: ParticleHandle,
    species: Species,
    dissociated: bool,
}

/// Deterministic stand-in for the external particle engine. Each tick it
/// rolls every conjugate-base particle against its species kinetics and
/// fires the matching reaction events.
pub struct ScriptedEngine {
    rng: fastrand::Rng,
    capacity: usize,
    next_handle: u64,
    particles: Vec<EngineParticle>,
}

impl ScriptedEngine {
    pub fn new(seed: u64, capacity: usize) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed),
            capacity,
            next_handle: 0,
            particles: Vec::new(),
        }
    }

    /// Advance one tick. The release event is pushed before the particle
    /// state flips, the capture event after; the session relies on exactly
    /// that ordering.
    pub fn step(&mut self) -> Vec<ReactionEvent> {
        let mut events = Vec::new();
        for particle in &mut self.particles {
            let props = particle.species.props();
            if !props.is_conjugate_base {
                continue;
            }
            if !particle.dissociated {
                if self.rng.f32() < props.release_chance {
                    events.push(ReactionEvent::ProtonReleasing {
                        species: particle.species,
                    });
                    particle.dissociated = true;
                }
            } else if self.rng.f32() < props.capture_chance {
                particle.dissociated = false;
                events.push(ReactionEvent::ProtonCaptured {
                    species: particle.species,
                });
            }
        }
        events
    }
}

impl ParticleEngine for ScriptedEngine {
    fn add_particles(
        &mut self,
        species: Species,
        count: usize,
    ) -> Result<Vec<ParticleHandle>, EngineError> {
        let available = self.capacity - self.particles.len();
        if count > available {
            return Err(EngineError::OutOfCapacity {
                requested: count,
                available,
            });
        }
        let mut handles = Vec::with_capacity(count);
        for _ in 0..count {
            let handle = ParticleHandle(self.next_handle);
            self.next_handle += 1;
            self.particles.push(EngineParticle {
                handle,
                species,
                dissociated: false,
            });
            handles.push(handle);
        }
        Ok(handles)
    }

    fn remove_particle(&mut self, handle: ParticleHandle) -> Result<(), EngineError> {
        match self.particles.iter().position(|p| p.handle == handle) {
            Some(i) => {
                self.particles.remove(i);
                Ok(())
            }
            None => Err(EngineError::UnknownHandle(handle)),
        }
    }
}

/// Prints the particle table line on every counter change, acids on the
/// left and free conjugate bases on the right.
struct ConsoleReadout;

impl CountReadout for ConsoleReadout {
    fn counts_changed(&mut self, dissociated: usize, associated: usize) {
        println!(
            "acid: {:>2}  <=>  conjugate base: {:>2}",
            associated, dissociated
        );
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match SessionConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("no session config, using defaults: {}", e);
            SessionConfig::default()
        }
    };
    let base_type = config.default_base_type()?;

    let capacity = config.total_conjugate_bases() + config.total_protons();
    let mut engine = ScriptedEngine::new(config::ENGINE_SEED, capacity);
    let mut session = Session::new(
        config.total_conjugate_bases(),
        config.total_protons(),
        config.proton_capacity(),
        base_type,
    );
    session.subscribe(Box::new(ConsoleReadout));
    session.populate(&mut engine)?;
    session.seed_protons(&mut engine)?;
    println!("pH: {}", session.render_ph());

    for tick in 0..config::DEMO_TICKS {
        if tick == config::DEMO_TICKS / 2 {
            let value = Species::WeakConjugateBase.control_value().to_string();
            log::info!("operator selects {}", value);
            process_command(
                SimCommand::SelectBaseType { value },
                &mut session,
                &mut engine,
            );
        }
        for event in engine.step() {
            session.handle_event(event);
        }
    }

    let (dissociated, associated) = session.render_values();
    println!(
        "after {} ticks as {}: {} dissociated, {} intact",
        config::DEMO_TICKS,
        session.base_type().props().label,
        dissociated,
        associated
    );
    Ok(())
}
