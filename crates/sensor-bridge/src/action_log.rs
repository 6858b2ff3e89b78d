//! Dry-run sink that logs actions instead of injecting them.
//!
//! Output is JSONL: a `#`-prefixed header line, then one record per sink
//! call carrying the time since the log was opened.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use handwave_common::clock::{SessionClock, TimestampNs};
use handwave_common::error::{HandwaveError, HandwaveResult};
use handwave_gesture_core::sink::{InputSink, KeySym, SinkCall};

/// First line of an action log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogHeader {
    pub schema_version: String,
    pub epoch_wall: String,
    pub screen_width: u32,
    pub screen_height: u32,
}

/// One logged sink call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Nanoseconds since the log was opened.
    pub t: TimestampNs,
    #[serde(flatten)]
    pub call: SinkCall,
}

/// Writes sink calls to a JSONL file.
pub struct ActionLogSink {
    writer: BufWriter<File>,
    path: PathBuf,
    clock: SessionClock,
    position: Option<(f64, f64)>,
    actions_written: u64,
}

impl ActionLogSink {
    /// Create the log, writing the header as the first line.
    pub fn create(path: &Path, screen_width: u32, screen_height: u32) -> HandwaveResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        let clock = SessionClock::start();
        let header = ActionLogHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: clock.epoch_wall().to_string(),
            screen_width,
            screen_height,
        };
        let header_json = serde_json::to_string(&header)?;
        writeln!(writer, "# {header_json}")
            .map_err(|e| HandwaveError::injection(format!("Failed to write header: {e}")))?;

        tracing::info!(path = %path.display(), "Dry run, logging actions");
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            clock,
            position: None,
            actions_written: 0,
        })
    }

    fn record(&mut self, call: SinkCall) -> HandwaveResult<()> {
        let record = ActionRecord {
            t: self.clock.elapsed_ns(),
            call,
        };
        let json = serde_json::to_string(&record)?;
        writeln!(self.writer, "{json}")
            .map_err(|e| HandwaveError::injection(format!("Failed to write action: {e}")))?;
        self.actions_written += 1;
        Ok(())
    }

    /// Flush buffered writes to disk.
    pub fn flush(&mut self) -> HandwaveResult<()> {
        self.writer
            .flush()
            .map_err(|e| HandwaveError::injection(format!("Failed to flush actions: {e}")))
    }

    pub fn actions_written(&self) -> u64 {
        self.actions_written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl InputSink for ActionLogSink {
    fn move_pointer(&mut self, x: f64, y: f64) -> HandwaveResult<()> {
        self.record(SinkCall::MovePointer { x, y })?;
        self.position = Some((x, y));
        Ok(())
    }

    fn click_primary(&mut self) -> HandwaveResult<()> {
        self.record(SinkCall::Click)?;
        self.flush()
    }

    fn press_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.record(SinkCall::Press { key })
    }

    fn release_key(&mut self, key: KeySym) -> HandwaveResult<()> {
        self.record(SinkCall::Release { key })
    }

    fn sync(&mut self) -> HandwaveResult<()> {
        self.record(SinkCall::Sync)?;
        self.flush()
    }

    fn pointer_position(&self) -> Option<(f64, f64)> {
        self.position
    }

    fn name(&self) -> &str {
        "action-log"
    }
}

impl Drop for ActionLogSink {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// Read the records of an action log, skipping the header.
pub fn read_action_log(path: &Path) -> HandwaveResult<Vec<ActionRecord>> {
    let content = std::fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty() && !line.starts_with('#'))
        .map(|line| serde_json::from_str(line).map_err(HandwaveError::from))
        .collect()
}
