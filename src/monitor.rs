//! Fixed-interval sampling loop

use crate::engine::{ChangeRecord, DiffEngine};
use crate::format::render_line;
use crate::input::InputSource;
use crate::sink::{LogMode, Sink};
use chrono::Local;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::time::Duration;

/// Requests a running monitor to stop
#[derive(Debug, Clone)]
pub struct StopHandle(mpsc::Sender<()>);

impl StopHandle {
    pub fn stop(&self) {
        // Receiver already gone means the loop has exited
        let _ = self.0.send(());
    }
}

/// Waited on by the sampling loop between ticks
#[derive(Debug)]
pub struct StopSignal(mpsc::Receiver<()>);

impl StopSignal {
    /// Sleep for `interval`; true if a stop was requested meanwhile.
    ///
    /// Dropping every [`StopHandle`] also counts as a stop.
    pub fn wait(&self, interval: Duration) -> bool {
        match self.0.recv_timeout(interval) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
        }
    }
}

/// Create a connected stop handle and signal
pub fn stop_channel() -> (StopHandle, StopSignal) {
    let (tx, rx) = mpsc::channel();
    (StopHandle(tx), StopSignal(rx))
}

/// Drives one [`DiffEngine`] from one [`InputSource`]
pub struct Monitor<S: InputSource> {
    engine: DiffEngine,
    source: S,
    interval: Duration,
    show_codes: bool,
    ticks: u64,
    records: u64,
}

impl<S: InputSource> Monitor<S> {
    pub fn new(source: S, interval: Duration) -> Self {
        Self::with_engine(DiffEngine::new(), source, interval)
    }

    pub fn with_engine(engine: DiffEngine, source: S, interval: Duration) -> Self {
        Self {
            engine,
            source,
            interval,
            show_codes: false,
            ticks: 0,
            records: 0,
        }
    }

    /// Append `_NNN` code suffixes to labels
    pub fn show_codes(mut self, show: bool) -> Self {
        self.show_codes = show;
        self
    }

    /// Sample once and write a line to `sink` if the state changed
    pub fn tick(&mut self, sink: &mut dyn Sink) -> Option<ChangeRecord> {
        self.ticks += 1;
        let record = self.engine.tick(&mut self.source, Local::now())?;

        self.records += 1;
        let mut line = render_line(&record, self.show_codes);
        line.push('\n');
        sink.write(&line, LogMode::All);
        Some(record)
    }

    /// Tick every `interval` until `stop` fires
    pub fn run(&mut self, sink: &mut dyn Sink, stop: &StopSignal) {
        log::info!(
            "sampling {} codes every {:?} via {}",
            self.engine.tracked().len(),
            self.interval,
            self.source.name()
        );

        while !stop.wait(self.interval) {
            self.tick(sink);
        }

        log::info!("stopped after {} ticks, {} records", self.ticks, self.records);
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn records_emitted(&self) -> u64 {
        self.records
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
