//! Audible cue playback seam.

use std::collections::HashMap;

use ecs_core::CueId;

/// Plays a named audible cue now. Playback itself is external.
pub trait CuePlayer {
    fn play(&mut self, cue: CueId);
}

/// A cue library that records every play request.
///
/// Used by the host vehicle as its player, and by tests to count
/// edge-triggered cues.
#[derive(Debug, Default, Clone)]
pub struct CueLog {
    names: Vec<String>,
    plays: HashMap<CueId, usize>,
    order: Vec<CueId>,
}

impl CueLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cue and return its handle.
    pub fn register(&mut self, name: impl Into<String>) -> CueId {
        let id = CueId::from_index(self.names.len() as u32);
        self.names.push(name.into());
        id
    }

    pub fn name(&self, cue: CueId) -> Option<&str> {
        self.names.get(cue.slot()).map(String::as_str)
    }

    /// Number of times `cue` has been played.
    pub fn count(&self, cue: CueId) -> usize {
        self.plays.get(&cue).copied().unwrap_or(0)
    }

    /// Every play, oldest first.
    pub fn history(&self) -> &[CueId] {
        &self.order
    }

    pub fn clear(&mut self) {
        self.plays.clear();
        self.order.clear();
    }
}

impl CuePlayer for CueLog {
    fn play(&mut self, cue: CueId) {
        tracing::debug!(cue = self.name(cue).unwrap_or("?"), "cue played");
        *self.plays.entry(cue).or_insert(0) += 1;
        self.order.push(cue);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_each_cue_separately() {
        let mut log = CueLog::new();
        let vent = log.register("PostLandingVent");
        let dead = log.register("CrewDead");

        log.play(vent);
        log.play(vent);
        log.play(dead);

        assert_eq!(log.count(vent), 2);
        assert_eq!(log.count(dead), 1);
        assert_eq!(log.history(), &[vent, vent, dead]);
        assert_eq!(log.name(dead), Some("CrewDead"));

        log.clear();
        assert_eq!(log.count(vent), 0);
    }
}
