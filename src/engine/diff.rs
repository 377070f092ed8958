//! Key-state diff engine
//!
//! Holds the current snapshot, the last committed snapshot and the ordered
//! diff between them. One engine is driven by exactly one sampling loop.

use super::{ChangeRecord, DiffEntry, Transition};
use crate::input::{tracked_codes, InputCode, InputSource};
use chrono::{DateTime, Local};
use indexmap::{IndexMap, IndexSet};

/// Sampling-and-diffing state machine
#[derive(Debug, Clone)]
pub struct DiffEngine {
    /// Codes sampled every tick
    tracked: Vec<InputCode>,
    /// Codes down at the latest sample, in the order they went down
    current: IndexSet<InputCode>,
    /// Snapshot committed with the last emitted record
    previous: IndexSet<InputCode>,
    /// Ordered transitions since the committed snapshot
    diff: IndexMap<InputCode, Transition>,
}

impl DiffEngine {
    /// Engine over the full tracked code space
    pub fn new() -> Self {
        Self::with_codes(tracked_codes().iter().copied())
    }

    /// Engine over a custom set of codes
    pub fn with_codes<I: IntoIterator<Item = InputCode>>(codes: I) -> Self {
        let mut tracked: Vec<InputCode> = codes
            .into_iter()
            .filter(|code| !code.is_aggregate_modifier())
            .collect();
        tracked.sort_unstable();
        tracked.dedup();

        Self {
            tracked,
            current: IndexSet::new(),
            previous: IndexSet::new(),
            diff: IndexMap::new(),
        }
    }

    /// Query every tracked code and update `current` in place.
    ///
    /// A failed query counts as "up" for this tick.
    pub fn sample<S: InputSource + ?Sized>(&mut self, source: &mut S) {
        source.refresh();

        for &code in &self.tracked {
            let down = match source.is_down(code) {
                Ok(down) => down,
                Err(e) => {
                    log::trace!("query for {} failed: {}", code, e);
                    false
                }
            };

            if down {
                self.current.insert(code);
            } else {
                self.current.shift_remove(&code);
            }
        }
    }

    /// Bring the ordered diff up to date with `current` and `previous`.
    ///
    /// Releases are recorded before presses and holds.
    pub fn reconcile(&mut self) {
        let previous = &self.previous;
        let current = &self.current;

        // Releases already reported on an earlier tick
        self.diff.retain(|code, _| previous.contains(code));

        for code in previous {
            if !current.contains(code) {
                if let Some(mark) = self.diff.get_mut(code) {
                    *mark = Transition::Released;
                }
            }
        }

        for &code in current {
            match self.diff.get_mut(&code) {
                Some(mark) => *mark = Transition::Held,
                None if !previous.contains(&code) => {
                    self.diff.insert(code, Transition::Pressed);
                }
                None => {}
            }
        }
    }

    /// Emit a record if the down-set differs from the committed snapshot.
    ///
    /// Only set membership is compared; on a change `current` becomes the new
    /// committed snapshot.
    pub fn detect_change(&mut self, timestamp: DateTime<Local>) -> Option<ChangeRecord> {
        if same_members(&self.current, &self.previous) {
            return None;
        }

        let entries = self
            .diff
            .iter()
            .map(|(&code, &mark)| DiffEntry::new(code, mark))
            .collect();
        self.previous = self.current.clone();
        Some(ChangeRecord::new(timestamp, entries))
    }

    /// One full tick: sample, reconcile, detect
    pub fn tick<S: InputSource + ?Sized>(
        &mut self,
        source: &mut S,
        timestamp: DateTime<Local>,
    ) -> Option<ChangeRecord> {
        self.sample(source);
        self.reconcile();
        self.detect_change(timestamp)
    }

    /// Codes down at the latest sample
    pub fn current(&self) -> &IndexSet<InputCode> {
        &self.current
    }

    /// Committed snapshot
    pub fn previous(&self) -> &IndexSet<InputCode> {
        &self.previous
    }

    /// Ordered diff as it stands now
    pub fn diff(&self) -> Vec<DiffEntry> {
        self.diff
            .iter()
            .map(|(&code, &mark)| DiffEntry::new(code, mark))
            .collect()
    }

    /// Codes sampled every tick
    pub fn tracked(&self) -> &[InputCode] {
        &self.tracked
    }
}

impl Default for DiffEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn same_members(a: &IndexSet<InputCode>, b: &IndexSet<InputCode>) -> bool {
    a.len() == b.len() && a.iter().all(|code| b.contains(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ScriptedSource;
    use super::Transition::{Held, Pressed, Released};

    const A: InputCode = InputCode(0x41);
    const B: InputCode = InputCode(0x42);
    const C: InputCode = InputCode(0x43);
    const LSHIFT: InputCode = InputCode(0xA0);

    /// Run one tick with the given down-set
    fn step(engine: &mut DiffEngine, down: &[InputCode]) -> Option<ChangeRecord> {
        let mut source = ScriptedSource::from_ticks([down.to_vec()]);
        engine.tick(&mut source, Local::now())
    }

    fn entries(record: &ChangeRecord) -> Vec<(InputCode, Transition)> {
        record.entries.iter().map(|e| (e.code, e.mark)).collect()
    }

    #[test]
    fn single_press_then_hold() {
        let mut engine = DiffEngine::new();

        let record = step(&mut engine, &[A]).expect("press should emit");
        assert_eq!(entries(&record), vec![(A, Pressed)]);

        // Set unchanged since the commit
        assert!(step(&mut engine, &[A]).is_none());
        assert_eq!(engine.diff(), vec![DiffEntry::new(A, Held)]);
    }

    #[test]
    fn release_and_press_in_same_tick_keep_order() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A]).unwrap();

        let record = step(&mut engine, &[B]).expect("change should emit");
        assert_eq!(entries(&record), vec![(A, Released), (B, Pressed)]);
    }

    #[test]
    fn released_code_is_pruned_on_next_tick() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A]).unwrap();

        let record = step(&mut engine, &[]).expect("release should emit");
        assert_eq!(entries(&record), vec![(A, Released)]);

        assert!(step(&mut engine, &[]).is_none());
        assert!(engine.diff().is_empty());
    }

    #[test]
    fn no_change_after_commit_emits_nothing() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A, B]).unwrap();
        for _ in 0..5 {
            assert!(step(&mut engine, &[A, B]).is_none());
        }
    }

    #[test]
    fn simultaneous_presses_follow_code_order() {
        let mut engine = DiffEngine::new();
        let record = step(&mut engine, &[C, A]).unwrap();
        assert_eq!(entries(&record), vec![(A, Pressed), (C, Pressed)]);
    }

    #[test]
    fn held_codes_keep_their_position() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[C]).unwrap();
        step(&mut engine, &[C, A]).unwrap();

        let record = step(&mut engine, &[C, A, B]).unwrap();
        assert_eq!(entries(&record), vec![(C, Held), (A, Held), (B, Pressed)]);

        // A released from the middle stays in its slot
        let record = step(&mut engine, &[C, B]).unwrap();
        assert_eq!(entries(&record), vec![(C, Held), (A, Released), (B, Held)]);
    }

    #[test]
    fn repress_after_drop_moves_to_end() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A, B]).unwrap();
        step(&mut engine, &[B]).unwrap(); // A released
        step(&mut engine, &[B, C]).unwrap(); // A pruned, C appended

        let record = step(&mut engine, &[A, B, C]).unwrap();
        assert_eq!(entries(&record), vec![(B, Held), (C, Held), (A, Pressed)]);
    }

    #[test]
    fn tap_lasting_one_sample_is_pressed_then_released() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A]).unwrap();

        let record = step(&mut engine, &[A, B]).unwrap();
        assert_eq!(record.mark_of(B), Some(Pressed));
        let record = step(&mut engine, &[A]).unwrap();
        assert_eq!(entries(&record), vec![(A, Held), (B, Released)]);

        // Pruned once reported
        assert!(step(&mut engine, &[A]).is_none());
        assert_eq!(engine.diff(), vec![DiffEntry::new(A, Held)]);
    }

    #[test]
    fn failed_query_counts_as_up() {
        let mut engine = DiffEngine::new();
        let mut source = ScriptedSource::from_ticks([vec![A, B]]).fail_on(A);

        let record = engine.tick(&mut source, Local::now()).unwrap();
        assert_eq!(entries(&record), vec![(B, Pressed)]);
        assert!(!engine.current().contains(&A));
    }

    #[test]
    fn failure_of_held_code_reports_release() {
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A]).unwrap();

        let mut source = ScriptedSource::from_ticks([vec![A]]).fail_on(A);
        let record = engine.tick(&mut source, Local::now()).unwrap();
        assert_eq!(entries(&record), vec![(A, Released)]);
    }

    #[test]
    fn aggregate_modifiers_are_never_sampled() {
        let engine = DiffEngine::with_codes([A, InputCode::SHIFT_KEY, LSHIFT]);
        assert_eq!(engine.tracked(), &[A, LSHIFT]);

        let mut engine = engine;
        let record = step(&mut engine, &[InputCode::SHIFT_KEY, LSHIFT]).unwrap();
        assert_eq!(entries(&record), vec![(LSHIFT, Pressed)]);
    }

    #[test]
    fn hold_marks_change_without_emission() {
        // Net set-level reporting: the diff moves to Held silently
        let mut engine = DiffEngine::new();
        step(&mut engine, &[A]).unwrap();
        assert!(step(&mut engine, &[A]).is_none());

        let record = step(&mut engine, &[A, B]).unwrap();
        assert_eq!(entries(&record), vec![(A, Held), (B, Pressed)]);
    }

    #[test]
    fn reconcile_does_not_commit() {
        let mut engine = DiffEngine::new();
        let mut source = ScriptedSource::from_ticks([vec![A]]);
        engine.sample(&mut source);
        engine.reconcile();

        assert!(engine.previous().is_empty());
        assert_eq!(engine.diff(), vec![DiffEntry::new(A, Pressed)]);

        let record = engine.detect_change(Local::now()).unwrap();
        assert!(engine.previous().contains(&A));
        assert_eq!(record.entries, engine.diff());
    }

    #[test]
    fn record_carries_sample_timestamp() {
        let mut engine = DiffEngine::new();
        let mut source = ScriptedSource::from_ticks([vec![A]]);
        let ts = Local::now();
        let record = engine.tick(&mut source, ts).unwrap();
        assert_eq!(record.timestamp, ts);
    }

    #[test]
    fn engines_are_independent() {
        let mut first = DiffEngine::new();
        let mut second = DiffEngine::new();
        step(&mut first, &[A]).unwrap();

        let record = step(&mut second, &[B]).unwrap();
        assert_eq!(entries(&record), vec![(B, Pressed)]);
        assert!(!second.previous().contains(&A));
    }

    /// Small deterministic generator so the sequence is reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self) -> u64 {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            self.0 >> 33
        }
    }

    #[test]
    fn emits_iff_down_set_changed_since_last_record() {
        let pool = [A, B, C, LSHIFT, InputCode::LBUTTON];
        let mut rng = Lcg(42);
        let mut engine = DiffEngine::new();
        let mut last_emitted: Vec<InputCode> = Vec::new();

        for _ in 0..500 {
            let mask = rng.next();
            let mut down: Vec<InputCode> = pool
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, &code)| code)
                .collect();
            down.sort_unstable();

            let mut source = ScriptedSource::from_ticks([down.clone()]);
            engine.sample(&mut source);
            engine.reconcile();

            // Diff invariants after reconciliation
            let diff = engine.diff();
            for entry in &diff {
                assert!(
                    engine.current().contains(&entry.code)
                        || engine.previous().contains(&entry.code)
                );
            }
            let mut codes: Vec<_> = diff.iter().map(|e| e.code).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), diff.len());

            let record = engine.detect_change(Local::now());
            assert_eq!(record.is_some(), down != last_emitted);
            if record.is_some() {
                last_emitted = down;
            }
        }
    }
}
