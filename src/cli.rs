//! Command-line arguments
//!
//! Flags override the config file, which overrides built-in defaults.

use crate::config::{Config, ConfigError, POLLING_RATE_RANGE};
use crate::input::Backend;
use clap::Parser;
use std::path::{self, PathBuf};

#[derive(Parser, Debug, Default)]
#[command(name = "keystate")]
#[command(version)]
#[command(about = "Keyboard & mouse \"state monitor\" with logging", long_about = None)]
pub struct Cli {
    /// Millisecond interval at which devices are polled [default: 5]
    #[arg(short = 'r', long = "polling-rate", value_name = "1-1000", value_parser = parse_polling_rate)]
    pub polling_rate: Option<u64>,

    /// Show or hide the hardware information header [default: true]
    #[arg(short = 'i', long = "display-info", value_name = "true|false", value_parser = parse_display_info)]
    pub display_info: Option<bool>,

    /// Folder where log files will be generated [default: ./logs]
    #[arg(short = 'p', long = "logfile-path", value_name = "FOLDER")]
    pub logfile_path: Option<PathBuf>,

    /// Alternate config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Append decimal code suffixes to key labels
    #[arg(long)]
    pub show_codes: bool,

    /// Input backend: auto, device-query or evdev
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<Backend>,

    /// Write the session summary as JSON to this file on exit
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,
}

fn parse_polling_rate(value: &str) -> Result<u64, String> {
    const ERR: &str = "Polling-Rate must be an integer from 1-1000";
    let rate: u64 = value.trim().parse().map_err(|_| ERR.to_string())?;
    if !POLLING_RATE_RANGE.contains(&rate) {
        return Err(ERR.to_string());
    }
    Ok(rate)
}

fn parse_display_info(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("Display-Info must be True or False".to_string()),
    }
}

impl Cli {
    /// Load the config file named by `--config`, or the default one
    pub fn load_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        self.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay the flags that were given onto `config`
    pub fn apply(&self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(rate) = self.polling_rate {
            config.monitor.polling_rate_ms = rate;
        }
        if let Some(backend) = self.backend {
            config.monitor.backend = backend;
        }
        if let Some(display_info) = self.display_info {
            config.output.display_info = display_info;
        }
        if let Some(dir) = &self.logfile_path {
            config.output.logfile_dir = dir.clone();
        }
        if self.show_codes {
            config.output.show_codes = true;
        }
        config.output.logfile_dir = path::absolute(&config.output.logfile_dir)?;
        Ok(())
    }
}
