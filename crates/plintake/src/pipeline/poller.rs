//! The poll loop: scan every watch directory, handle each new file, sleep, repeat.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use tracing::info_span;

use crate::config::{ChannelConfiguration, IntakeSettings};
use crate::db::{DatabaseError, PersistenceGateway};
use crate::error::{ConfigError, IntakeError};
use crate::storage::FileRelocator;
use crate::validator::{FilenameValidator, Verdict};
use crate::worker::{DirectoryScanner, ProcessedSet};

use super::intake::FileOutcome;
use super::recorder::ProcessRecorder;

/// Longest uninterrupted sleep while idle, so an interrupt is noticed quickly.
const IDLE_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerOptions {
    pub interval: Duration,
    pub processed_capacity: u64,
}

impl Default for PollerOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            processed_capacity: 10_000,
        }
    }
}

impl PollerOptions {
    pub fn from_settings(settings: &IntakeSettings) -> Self {
        Self {
            interval: settings.poller.interval(),
            processed_capacity: settings.poller.processed_capacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollerState {
    Idle,
    Scanning,
    Stopped,
}

/// Tally of one or more passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub move_failed: usize,
    pub record_failed: usize,
}

impl PassSummary {
    fn count(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Accepted { .. } => self.accepted += 1,
            FileOutcome::Rejected { .. } => self.rejected += 1,
            FileOutcome::MoveFailed => self.move_failed += 1,
            FileOutcome::Vanished => {}
        }
        if outcome.record_failed() {
            self.record_failed += 1;
        }
    }

    fn absorb(&mut self, other: PassSummary) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.move_failed += other.move_failed;
        self.record_failed += other.record_failed;
    }

    pub fn handled(&self) -> usize {
        self.accepted + self.rejected + self.move_failed
    }
}

/// Returned by [`Poller::run`] once the loop has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub passes: u64,
    pub totals: PassSummary,
}

pub struct Poller<G> {
    config: ChannelConfiguration,
    scanner: DirectoryScanner,
    validator: FilenameValidator,
    relocator: FileRelocator,
    recorder: ProcessRecorder<G>,
    processed: ProcessedSet,
    interval: Duration,
    state: PollerState,
    passes: u64,
}

impl<G: PersistenceGateway> Poller<G> {
    /// Fetches the channel configuration through `gateway` and builds a poller.
    pub fn bootstrap(
        gateway: G,
        channel_id: Option<&str>,
        options: PollerOptions,
    ) -> Result<Self, IntakeError> {
        let row = gateway.fetch_configuration(channel_id)?;
        let config = ChannelConfiguration::from_row(row)?;
        Ok(Self::new(gateway, config, options)?)
    }

    pub fn new(
        gateway: G,
        config: ChannelConfiguration,
        options: PollerOptions,
    ) -> Result<Self, ConfigError> {
        let validator = FilenameValidator::new(&config)?;
        let scanner = DirectoryScanner::new(config.watch_directories.clone());
        let relocator = FileRelocator::new(&config.input_location);
        let recorder = ProcessRecorder::new(gateway, &config);

        info!(
            "Poller ready for channel {}: prefix '{}', date format '{}', extension '{}', input {}",
            config.channel_id,
            config.name_prefix,
            config.date_format,
            config.extension,
            config.input_location.display()
        );

        Ok(Self {
            config,
            scanner,
            validator,
            relocator,
            recorder,
            processed: ProcessedSet::new(options.processed_capacity),
            interval: options.interval,
            state: PollerState::Scanning,
            passes: 0,
        })
    }

    pub fn config(&self) -> &ChannelConfiguration {
        &self.config
    }

    pub fn state(&self) -> PollerState {
        self.state
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn gateway(&self) -> &G {
        self.recorder.gateway()
    }

    /// Runs one full pass over every watch directory.
    pub fn run_pass(&mut self) -> PassSummary {
        self.state = PollerState::Scanning;
        self.passes += 1;
        let _span = info_span!("scan_pass", pass = self.passes).entered();

        let mut summary = PassSummary::default();
        for path in self.scanner.scan(&self.processed) {
            let outcome = self.process_file(&path);
            if outcome.is_terminal() {
                self.processed.insert(path);
            }
            summary.count(&outcome);
        }

        self.processed.prune_missing();

        if summary.handled() > 0 {
            info!(
                "Pass {} finished: {} accepted, {} rejected, {} move failure(s), {} unrecorded",
                self.passes,
                summary.accepted,
                summary.rejected,
                summary.move_failed,
                summary.record_failed
            );
        } else {
            debug!("Pass {} finished with nothing to do", self.passes);
        }

        self.state = PollerState::Idle;
        summary
    }

    /// Validates, relocates and records a single candidate.
    pub fn process_file(&self, path: &Path) -> FileOutcome {
        if !path.is_file() {
            debug!("Skipping {}: no longer present", path.display());
            return FileOutcome::Vanished;
        }

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let _span = info_span!("intake", filename = %filename).entered();

        let parsed = match self.validator.validate(&filename) {
            Verdict::Accepted(parsed) => parsed,
            Verdict::Rejected { reason, version } => {
                let recorded = self.recorder.record_rejected(&filename, &version, reason);
                return FileOutcome::Rejected { reason, recorded };
            }
        };

        let destination = match self.relocator.relocate(path) {
            Ok(destination) => destination,
            Err(e) => {
                error!("Error moving file {}: {}", filename, e);
                return FileOutcome::MoveFailed;
            }
        };
        info!(
            "File {} moved successfully to {}",
            filename,
            destination.display()
        );

        let recorded = self.recorder.record_accepted(&filename, &parsed);
        FileOutcome::Accepted {
            destination,
            parsed,
            recorded,
        }
    }

    /// Polls until `shutdown` is set, then releases the gateway.
    ///
    /// The first pass starts immediately. The flag is only consulted between
    /// passes, so a pass in flight always completes.
    pub fn run(mut self, shutdown: &AtomicBool) -> Result<RunSummary, DatabaseError> {
        info!(
            "Polling {} watch director(ies) every {:?}",
            self.scanner.directories().len(),
            self.interval
        );

        let mut totals = PassSummary::default();
        loop {
            totals.absorb(self.run_pass());

            if shutdown.load(Ordering::Relaxed) || !self.idle(shutdown) {
                break;
            }
        }

        self.state = PollerState::Stopped;
        info!("Stopping file processor after {} pass(es)", self.passes);

        let summary = RunSummary {
            passes: self.passes,
            totals,
        };
        self.recorder.into_gateway().close()?;
        Ok(summary)
    }

    /// Sleeps for one interval. Returns false if interrupted.
    fn idle(&self, shutdown: &AtomicBool) -> bool {
        let deadline = Instant::now() + self.interval;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                return false;
            }
            let now = Instant::now();
            if now >= deadline {
                return true;
            }
            std::thread::sleep(IDLE_SLICE.min(deadline - now));
        }
    }
}
