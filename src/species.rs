// Defines the particle species in the beaker and their reaction kinetics.
// The two conjugate-base species are the switch targets for the base-type
// control; protons are a fixed population used only for the pH readout.

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Species {
    StrongConjugateBase,
    WeakConjugateBase,
    Proton,
}

/// Per-species properties. The release/capture chances are per-tick
/// probabilities used by the demo engine; a strong base gives its proton up
/// readily and rarely takes one back, a weak base is the reverse.
#[derive(Clone, Copy, Debug)]
pub struct SpeciesProps {
    pub label: &'static str,
    pub is_conjugate_base: bool,
    pub release_chance: f32,
    pub capture_chance: f32,
}

impl Species {
    /// Validate a base-type control value against the closed species set.
    /// Only the two conjugate-base species are valid switch targets.
    pub fn from_control_value(value: &str) -> Result<Species, String> {
        match value {
            "StrongConjugateBase" => Ok(Species::StrongConjugateBase),
            "WeakConjugateBase" => Ok(Species::WeakConjugateBase),
            _ => Err(format!("unknown conjugate base type: {}", value)),
        }
    }

    pub fn control_value(self) -> &'static str {
        match self {
            Species::StrongConjugateBase => "StrongConjugateBase",
            Species::WeakConjugateBase => "WeakConjugateBase",
            Species::Proton => "Proton",
        }
    }

    pub fn is_conjugate_base(self) -> bool {
        matches!(
            self,
            Species::StrongConjugateBase | Species::WeakConjugateBase
        )
    }

    pub fn props(self) -> SpeciesProps {
        match self {
            Species::StrongConjugateBase => SpeciesProps {
                label: "strong acid",
                is_conjugate_base: true,
                release_chance: 0.20,
                capture_chance: 0.05,
            },
            Species::WeakConjugateBase => SpeciesProps {
                label: "weak acid",
                is_conjugate_base: true,
                release_chance: 0.03,
                capture_chance: 0.25,
            },
            Species::Proton => SpeciesProps {
                label: "proton",
                is_conjugate_base: false,
                release_chance: 0.0,
                capture_chance: 0.0,
            },
        }
    }
}
