//! Deterministic input source driven by a queue of snapshots

use super::{InputCode, InputSource, SourceError};
use std::collections::{HashSet, VecDeque};

/// Replays a fixed sequence of down-sets, one per tick.
///
/// When the script runs out the last snapshot stays in effect. Codes listed
/// with [`ScriptedSource::fail_on`] return an error from `is_down`.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<HashSet<InputCode>>,
    down: HashSet<InputCode>,
    failing: HashSet<InputCode>,
    refreshes: u64,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a source from per-tick down-sets
    pub fn from_ticks<I, T>(ticks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = InputCode>,
    {
        let mut source = Self::new();
        for tick in ticks {
            source.push_tick(tick);
        }
        source
    }

    /// Queue the down-set for one more tick
    pub fn push_tick<T: IntoIterator<Item = InputCode>>(&mut self, down: T) {
        self.script.push_back(down.into_iter().collect());
    }

    /// Make every query for `code` fail
    pub fn fail_on(mut self, code: InputCode) -> Self {
        self.failing.insert(code);
        self
    }

    /// Number of ticks still queued
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Number of `refresh` calls so far
    pub fn refreshes(&self) -> u64 {
        self.refreshes
    }
}

impl InputSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn refresh(&mut self) {
        self.refreshes += 1;
        if let Some(next) = self.script.pop_front() {
            self.down = next;
        }
    }

    fn is_down(&mut self, code: InputCode) -> Result<bool, SourceError> {
        if self.failing.contains(&code) {
            return Err(SourceError::Device(format!("scripted failure for {}", code)));
        }
        if code.name().is_none() {
            return Err(SourceError::UnknownCode(code));
        }
        Ok(self.down.contains(&code))
    }
}
