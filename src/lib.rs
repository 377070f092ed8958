//! keystate - Keyboard & mouse state monitor with logging
//!
//! Samples the down/up state of every key and pointer button at a fixed
//! interval and writes a timestamped line whenever the set of held inputs
//! changes.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod hardware;
pub mod input;
pub mod monitor;
pub mod report;
pub mod sink;

pub use config::Config;
pub use engine::{ChangeRecord, DiffEngine, DiffEntry, Transition};
pub use monitor::{stop_channel, Monitor, StopHandle, StopSignal};

/// Application name used for titles and log file names
pub const APP_NAME: &str = "keystate";

/// `major.minor` of the crate version
pub fn short_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match version.rfind('.') {
        Some(idx) => version[..idx].to_string(),
        None => version.to_string(),
    }
}
