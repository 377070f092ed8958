//! System information header

use sysinfo::System;

/// One `  TAG: value` line of the header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoLine {
    pub tag: &'static str,
    pub value: String,
}

impl InfoLine {
    fn new(tag: &'static str, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: handle_unknown(value.into()),
        }
    }
}

/// Blank or whitespace-only values render as "Unknown"
pub fn handle_unknown(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        "Unknown".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Gather what the host can tell us about itself and its input devices
pub fn collect() -> Vec<InfoLine> {
    let mut sys = System::new();
    sys.refresh_cpu_all();
    sys.refresh_memory();

    let os = System::long_os_version()
        .or_else(System::name)
        .unwrap_or_else(|| std::env::consts::OS.to_string());
    let kernel = System::kernel_version().unwrap_or_default();

    let mut lines = vec![
        InfoLine::new("OPS", os_line(&os, &kernel, std::env::consts::ARCH)),
        InfoLine::new(
            "HST",
            hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_default(),
        ),
        InfoLine::new(
            "CPU",
            cpu_line(
                sys.cpus().first().map(|cpu| cpu.brand()).unwrap_or(""),
                sys.cpus().len(),
            ),
        ),
        InfoLine::new("RAM", memory_line(sys.total_memory())),
    ];

    #[cfg(target_os = "linux")]
    {
        use crate::input::{input_devices, DeviceKind};
        for device in input_devices() {
            let tag = match device.kind {
                DeviceKind::Keyboard => "KEY",
                DeviceKind::Pointer => "PTR",
            };
            lines.push(InfoLine::new(
                tag,
                format!("{} - {}", device.name, device.path.display()),
            ));
        }
    }

    lines
}

fn os_line(os: &str, kernel: &str, arch: &str) -> String {
    if kernel.is_empty() {
        format!("{} - {}", os, arch)
    } else {
        format!("{} - {} - {}", os, kernel, arch)
    }
}

fn cpu_line(brand: &str, logical: usize) -> String {
    match (brand.trim(), logical) {
        (_, 0) => brand.trim().to_string(),
        ("", n) => format!("{} logical cores", n),
        (brand, n) => format!("{} - {} logical cores", brand, n),
    }
}

/// Total memory in GiB, one decimal
fn memory_line(total_bytes: u64) -> String {
    if total_bytes == 0 {
        return String::new();
    }
    format!("{:.1} GiB", total_bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// Render the header block, including its title line and trailing blank line
pub fn render(lines: &[InfoLine]) -> String {
    let mut out = String::from("[SYSTEM SPECS] - Querying Hardware Devices...\n");
    for line in lines {
        out.push_str(&format!("  {}: {}\n", line.tag, line.value));
    }
    out.push('\n');
    out
}
