//! Console and log-file output
//!
//! The monitor hands rendered lines to a [`Sink`]. [`LogWriter`] writes them
//! synchronously; [`BackgroundSink`] moves the writes onto their own thread so
//! a slow disk cannot stretch the sampling interval.

use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

/// Destinations for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// Console and log file
    All,
    Console,
    LogFile,
}

impl LogMode {
    fn console(&self) -> bool {
        matches!(self, LogMode::All | LogMode::Console)
    }

    fn file(&self) -> bool {
        matches!(self, LogMode::All | LogMode::LogFile)
    }
}

/// Receives rendered output
pub trait Sink {
    fn write(&mut self, text: &str, mode: LogMode);
}

/// Log file name for a session started at `started`
pub fn log_file_name(app: &str, started: &DateTime<Local>) -> String {
    format!("{}_{}.log", app, started.format("%Y%m%d_%H%M%S"))
}

/// Create the log directory and the session's log file
pub fn create_log_file(dir: &Path, app: &str, started: &DateTime<Local>) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(log_file_name(app, started));
    OpenOptions::new().create(true).append(true).open(&path)?;
    Ok(path)
}

/// Synchronous writer for the console and an optional log file
pub struct LogWriter {
    console: Box<dyn Write + Send>,
    file: Option<File>,
    path: Option<PathBuf>,
    file_failed: bool,
}

impl LogWriter {
    /// Writer for stdout, without a log file
    pub fn console_only() -> Self {
        Self::new(Box::new(io::stdout()), None)
    }

    /// Writer for an arbitrary console stream and an already opened file
    pub fn new(console: Box<dyn Write + Send>, file: Option<(PathBuf, File)>) -> Self {
        let (path, file) = match file {
            Some((path, file)) => (Some(path), Some(file)),
            None => (None, None),
        };
        Self {
            console,
            file,
            path,
            file_failed: false,
        }
    }

    /// Writer for stdout that appends to `path`
    pub fn with_file(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(
            Box::new(io::stdout()),
            Some((path.to_path_buf(), file)),
        ))
    }

    /// Path of the log file, if one is attached
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_file(&self) -> bool {
        self.file.is_some()
    }

    fn append(&mut self, text: &str) {
        let Some(file) = self.file.as_mut() else {
            return;
        };
        let result = file.write_all(text.as_bytes()).and_then(|_| file.flush());
        match result {
            Ok(()) => self.file_failed = false,
            Err(e) if !self.file_failed => {
                log::warn!("log file write failed, continuing on console: {}", e);
                self.file_failed = true;
            }
            Err(e) => log::debug!("log file write failed: {}", e),
        }
    }
}

impl Sink for LogWriter {
    fn write(&mut self, text: &str, mode: LogMode) {
        if mode.console() {
            let _ = self
                .console
                .write_all(text.as_bytes())
                .and_then(|_| self.console.flush());
        }
        if mode.file() {
            self.append(text);
        }
    }
}

/// Lines that may wait for the writer thread before writes start blocking
pub const DEFAULT_QUEUE_CAPACITY: usize = 4096;

/// Forwards lines over a bounded channel to a writer thread.
///
/// When the queue is full the caller waits for the writer rather than
/// dropping lines; the first such stall is logged.
pub struct BackgroundSink {
    tx: Option<mpsc::SyncSender<(String, LogMode)>>,
    handle: Option<JoinHandle<()>>,
    stalled: bool,
}

impl BackgroundSink {
    /// Move `inner` onto a dedicated writer thread
    pub fn spawn<S: Sink + Send + 'static>(inner: S) -> io::Result<Self> {
        Self::with_capacity(inner, DEFAULT_QUEUE_CAPACITY)
    }

    /// Like [`BackgroundSink::spawn`] with a queue of `capacity` lines
    pub fn with_capacity<S: Sink + Send + 'static>(
        mut inner: S,
        capacity: usize,
    ) -> io::Result<Self> {
        let (tx, rx) = mpsc::sync_channel::<(String, LogMode)>(capacity.max(1));
        let handle = thread::Builder::new()
            .name("keystate-writer".to_string())
            .spawn(move || {
                while let Ok((text, mode)) = rx.recv() {
                    inner.write(&text, mode);
                }
            })?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
            stalled: false,
        })
    }

    /// Whether a write has ever had to wait for a full queue
    pub fn has_stalled(&self) -> bool {
        self.stalled
    }

    /// Flush everything queued and stop the writer thread
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the channel ends the writer loop once it has drained
        self.tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("log writer thread panicked");
            }
        }
    }
}

impl Sink for BackgroundSink {
    fn write(&mut self, text: &str, mode: LogMode) {
        let Some(tx) = &self.tx else {
            return;
        };
        let sent = match tx.try_send((text.to_string(), mode)) {
            Ok(()) => Ok(()),
            Err(mpsc::TrySendError::Full(line)) => {
                if !self.stalled {
                    log::warn!("log writer is falling behind, output is now blocking");
                    self.stalled = true;
                }
                tx.send(line).map_err(|_| ())
            }
            Err(mpsc::TrySendError::Disconnected(_)) => Err(()),
        };
        if sent.is_err() {
            log::warn!("log writer thread is gone, dropping output");
        }
    }
}

impl Drop for BackgroundSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Collects everything written to it, for tests and previews
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub console: String,
    pub file: String,
}

impl Sink for MemorySink {
    fn write(&mut self, text: &str, mode: LogMode) {
        if mode.console() {
            self.console.push_str(text);
        }
        if mode.file() {
            self.file.push_str(text);
        }
    }
}
