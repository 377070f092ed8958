//! Platform input-state queries

use super::InputCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error raised by a single input-state query
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("unknown input code: {0:?}")]
    UnknownCode(InputCode),
    #[error("device query failed: {0}")]
    Device(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Answers "is this code down right now?" for the tracked code space.
pub trait InputSource {
    /// Short backend name for headers and summaries
    fn name(&self) -> &'static str;

    /// Called once per tick before any `is_down` query.
    ///
    /// Backends that read the whole device state in one call do it here.
    fn refresh(&mut self) {}

    /// Instantaneous state of one code
    fn is_down(&mut self, code: InputCode) -> Result<bool, SourceError>;
}

impl<S: InputSource + ?Sized> InputSource for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn refresh(&mut self) {
        (**self).refresh()
    }

    fn is_down(&mut self, code: InputCode) -> Result<bool, SourceError> {
        (**self).is_down(code)
    }
}

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    /// evdev on Linux when a device can be opened, device_query otherwise
    #[default]
    Auto,
    DeviceQuery,
    Evdev,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Auto => "auto",
            Backend::DeviceQuery => "device-query",
            Backend::Evdev => "evdev",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "device-query" | "devicequery" => Ok(Backend::DeviceQuery),
            "evdev" => Ok(Backend::Evdev),
            other => Err(format!(
                "unknown backend '{}' (expected auto, device-query or evdev)",
                other
            )),
        }
    }
}

/// Opens the input source for the requested backend.
///
/// `Auto` prefers evdev on Linux and falls back to device_query when no
/// input device can be opened.
pub fn open_source(backend: Backend) -> Result<Box<dyn InputSource>, SourceError> {
    match backend {
        Backend::DeviceQuery => Ok(Box::new(super::DeviceQuerySource::new())),
        #[cfg(target_os = "linux")]
        Backend::Evdev => Ok(Box::new(super::EvdevSource::open()?)),
        #[cfg(not(target_os = "linux"))]
        Backend::Evdev => Err(SourceError::Device(
            "evdev backend is only available on Linux".to_string(),
        )),
        Backend::Auto => {
            #[cfg(target_os = "linux")]
            {
                match super::EvdevSource::open() {
                    Ok(source) => return Ok(Box::new(source)),
                    Err(e) => {
                        log::warn!("evdev unavailable ({}), using device_query fallback", e);
                    }
                }
            }
            Ok(Box::new(super::DeviceQuerySource::new()))
        }
    }
}
