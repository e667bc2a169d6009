// Tracks how many conjugate bases have released their proton and republishes
// the counts to every subscribed readout after each change. This counter is
// the single source of truth for the particle table; only reaction events
// and the base-type switch may mutate it.

/// Receives the current counts whenever they change. The first value is the
/// number of dissociated bases, the second the number of intact acids.
pub trait CountReadout {
    fn counts_changed(&mut self, dissociated: usize, associated: usize);
}

pub struct ReactionCounter {
    total: usize,
    dissociated: usize,
    readouts: Vec<Box<dyn CountReadout>>,
}

impl ReactionCounter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            dissociated: 0,
            readouts: Vec::new(),
        }
    }

    /// Subscribe a readout and immediately push the current counts so a late
    /// subscriber never shows stale numbers.
    pub fn subscribe(&mut self, mut readout: Box<dyn CountReadout>) {
        readout.counts_changed(self.dissociated, self.total - self.dissociated);
        self.readouts.push(readout);
    }

    /// Handle the pre-event of a proton release. The engine fires this once
    /// per transition, before it flips the particle's own state.
    pub fn on_proton_released(&mut self) {
        if self.dissociated >= self.total {
            log::warn!(
                "release event with all {} bases already dissociated",
                self.total
            );
            debug_assert!(false, "release event past the population bound");
            return;
        }
        self.dissociated += 1;
        self.publish();
    }

    /// Handle the post-event of a proton capture, fired once per transition
    /// after the engine has flipped the particle's state.
    pub fn on_proton_captured(&mut self) {
        if self.dissociated == 0 {
            log::warn!("capture event with no dissociated base to reassociate");
            debug_assert!(false, "capture event below zero");
            return;
        }
        self.dissociated -= 1;
        self.publish();
    }

    /// Return to the fully-associated baseline of a fresh population.
    pub fn reset(&mut self) {
        self.dissociated = 0;
        self.publish();
    }

    /// Pure read of `(dissociated, associated)`; the pair always sums to the
    /// population size.
    pub fn render_values(&self) -> (usize, usize) {
        (self.dissociated, self.total - self.dissociated)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    fn publish(&mut self) {
        let (dissociated, associated) = (self.dissociated, self.total - self.dissociated);
        for readout in &mut self.readouts {
            readout.counts_changed(dissociated, associated);
        }
    }
}
