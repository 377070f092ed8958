//! Transition marks, diff entries and change records

use crate::input::InputCode;
use chrono::{DateTime, Local};

/// How a code changed relative to the last committed snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Newly down
    Pressed,
    /// Still down
    Held,
    /// Down in the committed snapshot, up now
    Released,
}

impl Transition {
    /// Single glyph rendered after the key label
    pub fn marker(&self) -> char {
        match self {
            Transition::Pressed => '↓',
            Transition::Held => '|',
            Transition::Released => '↑',
        }
    }
}

/// One position in the ordered diff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffEntry {
    pub code: InputCode,
    pub mark: Transition,
}

impl DiffEntry {
    pub fn new(code: InputCode, mark: Transition) -> Self {
        Self { code, mark }
    }
}

/// Emitted whenever the set of down codes changes
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    /// When the changing sample was taken
    pub timestamp: DateTime<Local>,
    /// The diff, in first-appearance order
    pub entries: Vec<DiffEntry>,
}

impl ChangeRecord {
    pub fn new(timestamp: DateTime<Local>, entries: Vec<DiffEntry>) -> Self {
        Self { timestamp, entries }
    }

    /// Codes in emitted order
    pub fn codes(&self) -> impl Iterator<Item = InputCode> + '_ {
        self.entries.iter().map(|e| e.code)
    }

    /// Mark recorded for a code, if it appears in this record
    pub fn mark_of(&self, code: InputCode) -> Option<Transition> {
        self.entries.iter().find(|e| e.code == code).map(|e| e.mark)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
