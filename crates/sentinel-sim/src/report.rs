//! Event log and run summary.

use sentinel_ai::{AgentEvent, StateKind};
use sentinel_common::SentinelError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// One event with the time and guard it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Simulated seconds when the event was raised
    pub time: f32,
    /// Guard name
    pub guard: String,
    /// What happened
    pub event: AgentEvent,
}

impl EventRecord {
    /// Creates a record.
    pub fn new(time: f32, guard: &str, event: AgentEvent) -> Self {
        Self {
            time,
            guard: guard.to_string(),
            event,
        }
    }
}

/// Writes records as JSON lines.
pub struct EventLog<W: Write> {
    writer: BufWriter<W>,
    written: usize,
}

impl EventLog<fs::File> {
    /// Creates (or truncates) a log file, making parent directories as needed.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self::new(fs::File::create(path)?))
    }
}

impl<W: Write> EventLog<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            written: 0,
        }
    }

    /// Appends one record.
    pub fn write(&mut self, record: &EventRecord) -> Result<(), SentinelError> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| SentinelError::Serialization(e.to_string()))?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Records written so far.
    pub const fn written(&self) -> usize {
        self.written
    }

    /// Flushes and returns the inner writer.
    pub fn finish(self) -> io::Result<W> {
        self.writer.into_inner().map_err(io::IntoInnerError::into_error)
    }
}

/// Counts of what happened during a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Ticks simulated
    pub ticks: u64,
    /// Simulated seconds
    pub elapsed: f32,
    /// State changes across all guards
    pub transitions: usize,
    /// Entries into Chase
    pub chases: usize,
    /// Times a guard spotted the intruder
    pub sightings: usize,
    /// Noises taken up
    pub noises_claimed: usize,
    /// Noises ignored
    pub noises_rejected: usize,
    /// Strikes that connected
    pub strikes_landed: usize,
    /// Strikes cut short
    pub strikes_abandoned: usize,
    /// Time of the first landed strike
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_strike_at: Option<f32>,
}

impl Summary {
    /// Counts one record.
    pub fn record(&mut self, record: &EventRecord) {
        match record.event {
            AgentEvent::StateChanged { to, .. } => {
                self.transitions += 1;
                if to == StateKind::Chase {
                    self.chases += 1;
                }
            },
            AgentEvent::TargetSighted { .. } => self.sightings += 1,
            AgentEvent::TargetLost { .. } => {},
            AgentEvent::NoiseClaimed { .. } => self.noises_claimed += 1,
            AgentEvent::NoiseRejected { .. } => self.noises_rejected += 1,
            AgentEvent::StrikeLanded { .. } => {
                self.strikes_landed += 1;
                self.first_strike_at.get_or_insert(record.time);
            },
            AgentEvent::StrikeAbandoned { .. } => self.strikes_abandoned += 1,
        }
    }

    /// Whether the intruder was caught.
    pub const fn caught(&self) -> bool {
        self.first_strike_at.is_some()
    }
}
