//! Sampling-and-diffing engine

mod diff;
mod record;

pub use diff::DiffEngine;
pub use record::{ChangeRecord, DiffEntry, Transition};
