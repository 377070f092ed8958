//! Input codes, labels and platform state sources

mod code;
mod device_query_source;
pub mod label;
mod scripted;
mod source;

#[cfg(target_os = "linux")]
mod evdev_source;

pub use code::{tracked_codes, InputCode, AGGREGATE_MODIFIERS};
pub use device_query_source::{keycode_to_input, DeviceQuerySource};
pub use label::label;
pub use scripted::ScriptedSource;
pub use source::{open_source, Backend, InputSource, SourceError};

#[cfg(target_os = "linux")]
pub use evdev_source::{evdev_to_input, input_devices, DeviceInfo, DeviceKind, EvdevSource};
