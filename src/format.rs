//! Text rendering of change records

use crate::engine::ChangeRecord;
use crate::input::label;
use chrono::{DateTime, Local, Timelike};

/// `yyyy-MM-dd HH:mm:ss:ffff`, the fraction in tenths of a millisecond
pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    // Leap-second nanos can exceed 1e9
    let tenths_ms = (ts.nanosecond() / 100_000).min(9_999);
    format!("{}:{:04}", ts.format("%Y-%m-%d %H:%M:%S"), tenths_ms)
}

/// Space-joined `<label><marker>` tokens
pub fn render_entries(record: &ChangeRecord, show_codes: bool) -> String {
    record
        .entries
        .iter()
        .map(|entry| format!("{}{}", label(entry.code, show_codes), entry.mark.marker()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// One log line for a record, without the trailing newline
pub fn render_line(record: &ChangeRecord, show_codes: bool) -> String {
    format!(
        "  {}  {}",
        format_timestamp(&record.timestamp),
        render_entries(record, show_codes)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{DiffEntry, Transition};
    use crate::input::InputCode;
    use chrono::TimeZone;

    fn at(nanos: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 9, 14, 5, 7)
            .unwrap()
            .with_nanosecond(nanos)
            .unwrap()
    }

    #[test]
    fn timestamp_has_four_fraction_digits() {
        assert_eq!(format_timestamp(&at(0)), "2024-03-09 14:05:07:0000");
        assert_eq!(format_timestamp(&at(123_456_789)), "2024-03-09 14:05:07:1234");
        assert_eq!(format_timestamp(&at(999_999_999)), "2024-03-09 14:05:07:9999");
    }

    #[test]
    fn line_joins_labels_and_markers() {
        let record = ChangeRecord::new(
            at(500_000_000),
            vec![
                DiffEntry::new(InputCode(0xA0), Transition::Held),
                DiffEntry::new(InputCode(0x31), Transition::Released),
                DiffEntry::new(InputCode(0xBA), Transition::Pressed),
            ],
        );
        assert_eq!(
            render_line(&record, false),
            "  2024-03-09 14:05:07:5000  LShift| 1↑ ;↓"
        );
    }

    #[test]
    fn line_with_codes() {
        let record = ChangeRecord::new(
            at(0),
            vec![DiffEntry::new(InputCode::LBUTTON, Transition::Pressed)],
        );
        assert_eq!(render_entries(&record, true), "LButton_001↓");
    }

    #[test]
    fn empty_record_renders_timestamp_only() {
        let record = ChangeRecord::new(at(0), Vec::new());
        assert_eq!(render_line(&record, false), "  2024-03-09 14:05:07:0000  ");
    }
}
