//! keystate - Keyboard & mouse state monitor
//!
//! Polls every key and pointer button and logs each change of the held set.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{execute, terminal::SetTitle};
use std::io::stdout;
use std::time::Instant;

use keystate::{
    cli::Cli,
    hardware,
    input::open_source,
    report::SessionSummary,
    short_version, sink,
    sink::{BackgroundSink, LogMode, LogWriter, Sink},
    stop_channel, Monitor, APP_NAME,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.load_config().context("invalid configuration")?;

    let started_at = Local::now();
    let started = Instant::now();
    let title = format!("{} v{}", APP_NAME, short_version());
    let mut out = stdout();
    let _ = execute!(out, SetTitle(&title));

    // Startup notification
    let init = format!(
        "{} - Starting...\n\n[POLLING RATE] - {}ms\n\n",
        title, config.monitor.polling_rate_ms
    );
    let mut writer = LogWriter::console_only();
    writer.write(&init, LogMode::Console);

    let log_dir = &config.output.logfile_dir;
    let mut writer = match sink::create_log_file(log_dir, APP_NAME, &started_at)
        .and_then(|path| LogWriter::with_file(&path))
    {
        Ok(mut file_writer) => {
            file_writer.write(&init, LogMode::LogFile);
            if let Some(path) = file_writer.path() {
                file_writer.write(
                    &format!(
                        "[LOGFILE PATH] - Initializing Log File...\n  {}\n\n",
                        path.display()
                    ),
                    LogMode::Console,
                );
            }
            file_writer
        }
        Err(e) => {
            log::warn!("log file unavailable in {}: {}", log_dir.display(), e);
            writer.write(
                &format!("[LOGFILE PATH] - Initializing Log File...\n  ERR: {}\n\n", e),
                LogMode::Console,
            );
            writer
        }
    };

    if config.output.display_info {
        writer.write(&hardware::render(&hardware::collect()), LogMode::All);
    }

    let source = open_source(config.monitor.backend).context("no usable input backend")?;
    let backend = source.name();

    let (stop_handle, stop_signal) = stop_channel();
    ctrlc::set_handler(move || stop_handle.stop()).context("installing Ctrl+C handler")?;

    writer.write("[RECORD INPUT] - Monitoring Input Devices...\n", LogMode::All);

    let mut sink = BackgroundSink::spawn(writer).context("starting log writer")?;
    let mut monitor = Monitor::new(source, config.polling_interval())
        .show_codes(config.output.show_codes);
    monitor.run(&mut sink, &stop_signal);
    sink.finish();

    let summary = SessionSummary::new(
        started_at,
        started,
        monitor.ticks(),
        monitor.records_emitted(),
        config.monitor.polling_rate_ms,
        backend,
    );

    println!("\n{} session complete.", APP_NAME);
    println!("State changes recorded: {}", summary.records_emitted);
    println!("Session duration: {}", summary.duration_formatted());

    if let Some(path) = &cli.summary {
        summary
            .export_json(path)
            .with_context(|| format!("writing summary to {}", path.display()))?;
    }

    Ok(())
}
