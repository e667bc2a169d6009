// Session configuration: compile-time defaults plus optional overrides
// loaded from session_config.toml.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::species::Species;

pub const NUM_CONJUGATE_BASES: usize = 10;
pub const NUM_PROTONS: usize = 10;
/// Free-proton capacity the linear pH map is anchored to.
pub const PROTON_PH_CAPACITY: usize = 128;
pub const DEFAULT_BASE_TYPE: Species = Species::StrongConjugateBase;

/// Ticks the headless driver advances the demo engine.
pub const DEMO_TICKS: usize = 40;
/// Fixed seed for the demo engine so a run is reproducible.
pub const ENGINE_SEED: u64 = 0x0b_ea_4e_55;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Size of the conjugate-base population; fixed for the session.
    pub total_conjugate_bases: Option<usize>,
    /// Size of the free-proton population; fixed for the session.
    pub total_protons: Option<usize>,
    pub proton_capacity: Option<usize>,
    /// Control value of the base type active at startup.
    pub default_base_type: Option<String>,
}

impl SessionConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = fs::read_to_string(path)?;
        let config: SessionConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_default() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_file("session_config.toml")
    }

    pub fn total_conjugate_bases(&self) -> usize {
        self.total_conjugate_bases.unwrap_or(NUM_CONJUGATE_BASES)
    }

    pub fn total_protons(&self) -> usize {
        self.total_protons.unwrap_or(NUM_PROTONS)
    }

    pub fn proton_capacity(&self) -> usize {
        self.proton_capacity.unwrap_or(PROTON_PH_CAPACITY)
    }

    pub fn default_base_type(&self) -> Result<Species, String> {
        match &self.default_base_type {
            Some(value) => Species::from_control_value(value),
            None => Ok(DEFAULT_BASE_TYPE),
        }
    }
}
