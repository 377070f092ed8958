//! Raw evdev-based input source for Linux
//!
//! Reads the kernel's key-state bitmap of every keyboard and pointer device,
//! which also covers OEM keys that device_query cannot see.

use super::{InputCode, InputSource, SourceError};
use evdev::{Device, Key};
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

/// Kind of input device, judged from its supported keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceKind {
    Keyboard,
    Pointer,
}

impl DeviceKind {
    fn classify(device: &Device) -> Option<Self> {
        let keys = device.supported_keys()?;
        if keys.contains(Key::KEY_A) && keys.contains(Key::KEY_Z) {
            Some(DeviceKind::Keyboard)
        } else if keys.contains(Key::BTN_LEFT) {
            Some(DeviceKind::Pointer)
        } else {
            None
        }
    }
}

/// Name and kind of an input device found under /dev/input
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub kind: DeviceKind,
}

/// Find all keyboard and pointer devices we are allowed to open
fn find_input_devices() -> Vec<(DeviceInfo, Device)> {
    evdev::enumerate()
        .filter_map(|(path, device)| {
            let kind = DeviceKind::classify(&device)?;
            let name = device.name().unwrap_or("Unknown").trim().to_string();
            Some((DeviceInfo { path, name, kind }, device))
        })
        .collect()
}

/// Describe the input devices visible to evdev, for the system header
pub fn input_devices() -> Vec<DeviceInfo> {
    find_input_devices().into_iter().map(|(info, _)| info).collect()
}

/// Evdev-backed source; one key-state read per device per tick
pub struct EvdevSource {
    devices: Vec<(DeviceInfo, Device)>,
    down: HashSet<InputCode>,
}

impl EvdevSource {
    /// Open every readable keyboard and pointer device
    pub fn open() -> Result<Self, SourceError> {
        let devices = find_input_devices();
        if devices.is_empty() {
            return Err(SourceError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "cannot access any input devices; run with sudo or add user to the 'input' group",
            )));
        }

        for (info, _) in &devices {
            log::debug!("evdev: {:?} {} ({})", info.kind, info.name, info.path.display());
        }

        Ok(Self {
            devices,
            down: HashSet::new(),
        })
    }

    /// Get the number of opened devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }
}

impl InputSource for EvdevSource {
    fn name(&self) -> &'static str {
        "evdev"
    }

    fn refresh(&mut self) {
        self.down.clear();

        for (info, device) in &self.devices {
            match device.get_key_state() {
                Ok(state) => {
                    self.down
                        .extend(state.iter().filter_map(|key| evdev_to_input(key.code())));
                }
                Err(e) => {
                    // Device unplugged or revoked; its keys read as up this tick
                    log::debug!("evdev: key state of {} failed: {}", info.path.display(), e);
                }
            }
        }
    }

    fn is_down(&mut self, code: InputCode) -> Result<bool, SourceError> {
        if code.name().is_none() {
            return Err(SourceError::UnknownCode(code));
        }
        Ok(self.down.contains(&code))
    }
}

/// Map a Linux evdev key code into the virtual-key code space
pub fn evdev_to_input(code: u16) -> Option<InputCode> {
    let vk = match code {
        1 => 0x1B,                    // Esc
        2..=10 => 0x31 + (code - 2),  // 1-9
        11 => 0x30,                   // 0
        12 => 0xBD,
        13 => 0xBB,
        14 => 0x08,
        15 => 0x09,
        16 => 0x51,
        17 => 0x57,
        18 => 0x45,
        19 => 0x52,
        20 => 0x54,
        21 => 0x59,
        22 => 0x55,
        23 => 0x49,
        24 => 0x4F,
        25 => 0x50,
        26 => 0xDB,
        27 => 0xDD,
        28 | 96 => 0x0D, // Enter, KP Enter
        29 => 0xA2,
        30 => 0x41,
        31 => 0x53,
        32 => 0x44,
        33 => 0x46,
        34 => 0x47,
        35 => 0x48,
        36 => 0x4A,
        37 => 0x4B,
        38 => 0x4C,
        39 => 0xBA,
        40 => 0xDE,
        41 => 0xC0,
        42 => 0xA0,
        43 => 0xDC,
        44 => 0x5A,
        45 => 0x58,
        46 => 0x43,
        47 => 0x56,
        48 => 0x42,
        49 => 0x4E,
        50 => 0x4D,
        51 => 0xBC,
        52 => 0xBE,
        53 => 0xBF,
        54 => 0xA1,
        55 => 0x6A,
        56 => 0xA4,
        57 => 0x20,
        58 => 0x14,
        59..=68 => 0x70 + (code - 59), // F1-F10
        69 => 0x90,
        70 => 0x91,
        71 => 0x67,
        72 => 0x68,
        73 => 0x69,
        74 => 0x6D,
        75 => 0x64,
        76 => 0x65,
        77 => 0x66,
        78 => 0x6B,
        79 => 0x61,
        80 => 0x62,
        81 => 0x63,
        82 => 0x60,
        83 => 0x6E,
        86 => 0xE2,
        87 => 0x7A,
        88 => 0x7B,
        97 => 0xA3,
        98 => 0x6F,
        99 => 0x2C,
        100 => 0xA5,
        102 => 0x24,
        103 => 0x26,
        104 => 0x21,
        105 => 0x25,
        106 => 0x27,
        107 => 0x23,
        108 => 0x28,
        109 => 0x22,
        110 => 0x2D,
        111 => 0x2E,
        113 => 0xAD,
        114 => 0xAE,
        115 => 0xAF,
        119 => 0x13,
        125 => 0x5B,
        126 => 0x5C,
        127 => 0x5D,
        140 => 0xB7,
        142 => 0x5F,
        155 => 0xB4,
        156 => 0xAB,
        158 => 0xA6,
        159 => 0xA7,
        163 => 0xB0,
        164 => 0xB3,
        165 => 0xB1,
        166 => 0xB2,
        172 => 0xAC,
        173 => 0xA8,
        183..=194 => 0x7C + (code - 183), // F13-F24
        217 => 0xAA,
        272 => 0x01, // BTN_LEFT
        273 => 0x02, // BTN_RIGHT
        274 => 0x04, // BTN_MIDDLE
        275 => 0x05, // BTN_SIDE
        276 => 0x06, // BTN_EXTRA
        _ => return None,
    };
    Some(InputCode(vk))
}
