//! Cross-platform input source backed by device_query

use super::{InputCode, InputSource, SourceError};
use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashSet;

/// Polls the keyboard and mouse through `device_query`.
///
/// One device read happens per tick in [`InputSource::refresh`]; `is_down`
/// answers from that snapshot.
pub struct DeviceQuerySource {
    device_state: DeviceState,
    down: HashSet<InputCode>,
}

impl DeviceQuerySource {
    pub fn new() -> Self {
        Self {
            device_state: DeviceState::new(),
            down: HashSet::new(),
        }
    }
}

impl Default for DeviceQuerySource {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for DeviceQuerySource {
    fn name(&self) -> &'static str {
        "device-query"
    }

    fn refresh(&mut self) {
        self.down.clear();

        for key in self.device_state.get_keys() {
            if let Some(code) = keycode_to_input(key) {
                self.down.insert(code);
            }
        }

        let mouse = self.device_state.get_mouse();
        for (index, pressed) in mouse.button_pressed.iter().enumerate() {
            if *pressed {
                if let Some(code) = mouse_button_to_input(index) {
                    self.down.insert(code);
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

/// Mouse button index as reported by device_query (index 0 is unused)
fn mouse_button_to_input(index: usize) -> Option<InputCode> {
    match index {
        1 => Some(InputCode::LBUTTON),
        2 => Some(InputCode::RBUTTON),
        3 => Some(InputCode::MBUTTON),
        4 => Some(InputCode::XBUTTON1),
        5 => Some(InputCode::XBUTTON2),
        _ => None,
    }
}

/// Map device_query keycodes into the virtual-key code space
pub fn keycode_to_input(keycode: Keycode) -> Option<InputCode> {
    use device_query::Keycode as DK;
    let code = match keycode {
        DK::Escape => 0x1B,
        DK::Key1 => 0x31,
        DK::Key2 => 0x32,
        DK::Key3 => 0x33,
        DK::Key4 => 0x34,
        DK::Key5 => 0x35,
        DK::Key6 => 0x36,
        DK::Key7 => 0x37,
        DK::Key8 => 0x38,
        DK::Key9 => 0x39,
        DK::Key0 => 0x30,
        DK::Minus => 0xBD,
        DK::Equal => 0xBB,
        DK::Backspace => 0x08,
        DK::Tab => 0x09,
        DK::Q => 0x51,
        DK::W => 0x57,
        DK::E => 0x45,
        DK::R => 0x52,
        DK::T => 0x54,
        DK::Y => 0x59,
        DK::U => 0x55,
        DK::I => 0x49,
        DK::O => 0x4F,
        DK::P => 0x50,
        DK::LeftBracket => 0xDB,
        DK::RightBracket => 0xDD,
        DK::Enter => 0x0D,
        DK::LControl => 0xA2,
        DK::A => 0x41,
        DK::S => 0x53,
        DK::D => 0x44,
        DK::F => 0x46,
        DK::G => 0x47,
        DK::H => 0x48,
        DK::J => 0x4A,
        DK::K => 0x4B,
        DK::L => 0x4C,
        DK::Semicolon => 0xBA,
        DK::Apostrophe => 0xDE,
        DK::Grave => 0xC0,
        DK::LShift => 0xA0,
        DK::BackSlash => 0xDC,
        DK::Z => 0x5A,
        DK::X => 0x58,
        DK::C => 0x43,
        DK::V => 0x56,
        DK::B => 0x42,
        DK::N => 0x4E,
        DK::M => 0x4D,
        DK::Comma => 0xBC,
        DK::Dot => 0xBE,
        DK::Slash => 0xBF,
        DK::RShift => 0xA1,
        DK::LAlt => 0xA4,
        DK::Space => 0x20,
        DK::CapsLock => 0x14,
        DK::F1 => 0x70,
        DK::F2 => 0x71,
        DK::F3 => 0x72,
        DK::F4 => 0x73,
        DK::F5 => 0x74,
        DK::F6 => 0x75,
        DK::F7 => 0x76,
        DK::F8 => 0x77,
        DK::F9 => 0x78,
        DK::F10 => 0x79,
        DK::F11 => 0x7A,
        DK::F12 => 0x7B,
        DK::RControl => 0xA3,
        DK::RAlt => 0xA5,
        DK::Home => 0x24,
        DK::Up => 0x26,
        DK::PageUp => 0x21,
        DK::Left => 0x25,
        DK::Right => 0x27,
        DK::End => 0x23,
        DK::Down => 0x28,
        DK::PageDown => 0x22,
        DK::Insert => 0x2D,
        DK::Delete => 0x2E,
        DK::LMeta => 0x5B,
        DK::RMeta => 0x5C,
        DK::Numpad0 => 0x60,
        DK::Numpad1 => 0x61,
        DK::Numpad2 => 0x62,
        DK::Numpad3 => 0x63,
        DK::Numpad4 => 0x64,
        DK::Numpad5 => 0x65,
        DK::Numpad6 => 0x66,
        DK::Numpad7 => 0x67,
        DK::Numpad8 => 0x68,
        DK::Numpad9 => 0x69,
        DK::NumpadSubtract => 0x6D,
        DK::NumpadAdd => 0x6B,
        DK::NumpadDivide => 0x6F,
        DK::NumpadMultiply => 0x6A,
        _ => return None,
    };
    Some(InputCode(code))
}
