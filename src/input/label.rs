//! Human-readable labels for input codes

use super::InputCode;

/// Display label for a code, with the friendly remaps applied.
///
/// When `show_code` is set, a `_NNN` suffix with the decimal code is appended.
pub fn label(code: InputCode, show_code: bool) -> String {
    let raw = code.to_string();
    let mut face = match friendly_name(&raw) {
        Some(name) => name.to_string(),
        None => raw,
    };

    if face.starts_with("Oem") {
        if let Some(ch) = oem_char(code) {
            face = ch.to_string();
        }
    }

    if show_code {
        face.push_str(&format!("_{:03}", code.as_u16()));
    }
    face
}

fn friendly_name(raw: &str) -> Option<&'static str> {
    let name = match raw {
        "Capital" => "CapsLock",
        "D0" => "0",
        "D1" => "1",
        "D2" => "2",
        "D3" => "3",
        "D4" => "4",
        "D5" => "5",
        "D6" => "6",
        "D7" => "7",
        "D8" => "8",
        "D9" => "9",
        "LControlKey" => "LCtrl",
        "LMenu" => "LAlt",
        "LShiftKey" => "LShift",
        "PageUp" => "PgUp",
        "PageDown" => "PgDn",
        "RControlKey" => "RCtrl",
        "RMenu" => "RAlt",
        "RShiftKey" => "RShift",
        _ => return None,
    };
    Some(name)
}

/// Character produced by an Oem key on a US layout
fn oem_char(code: InputCode) -> Option<char> {
    let ch = match code.as_u16() {
        0xBA => ';',
        0xBB => '=',
        0xBC => ',',
        0xBD => '-',
        0xBE => '.',
        0xBF => '/',
        0xC0 => '`',
        0xDB => '[',
        0xDC => '\\',
        0xDD => ']',
        0xDE => '\'',
        0xE2 => '\\',
        _ => return None,
    };
    Some(ch)
}
