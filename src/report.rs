//! Session summary and export functionality

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// What one monitoring session did
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    /// Session start (RFC 3339)
    pub started_at: String,
    /// Session duration in seconds
    pub duration_secs: f64,
    /// Sampling ticks executed
    pub ticks: u64,
    /// Change records written
    pub records_emitted: u64,
    /// Configured polling interval
    pub polling_rate_ms: u64,
    /// Input backend that was used
    pub backend: String,
    /// Application version
    pub version: String,
}

impl SessionSummary {
    pub fn new(
        started_at: DateTime<Local>,
        started: Instant,
        ticks: u64,
        records_emitted: u64,
        polling_rate_ms: u64,
        backend: &str,
    ) -> Self {
        Self {
            started_at: started_at.to_rfc3339(),
            duration_secs: started.elapsed().as_secs_f64(),
            ticks,
            records_emitted,
            polling_rate_ms,
            backend: backend.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Human-readable duration, `HH:MM:SS`
    pub fn duration_formatted(&self) -> String {
        let secs = self.duration_secs as u64;
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }

    /// Export summary to JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export summary to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
