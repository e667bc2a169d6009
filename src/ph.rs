// pH derivation for the readout. Pure functions only; the free-proton count
// is held constant for a session, so the value is computed once at setup,
// but it stays callable for recomputation on demand.

/// Linear pH map over the free-proton count, anchored so that half the
/// capacity maps to pH 0 and an empty beaker to pH 14.
pub fn compute_ph(free_protons: usize, capacity: usize) -> f64 {
    let midpoint = capacity as f64 / 2.0;
    let span = capacity as f64 / 4.0;
    7.0 * (midpoint - free_protons as f64) / span
}

/// Format a pH value the way the readout displays it.
pub fn format_ph(ph: f64) -> String {
    format!("{:.2}", ph)
}
