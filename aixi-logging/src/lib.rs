//! aixi-logging: append-only per-cycle CSV records plus an end-of-run JSON
//! summary written atomically.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Error)]
pub enum LogError {
    #[error("log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("log serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One agent/environment interaction cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleRecordV1 {
    pub cycle: u64,
    pub observation: u32,
    pub reward: u32,
    pub action: u32,
    pub explored: bool,
    pub explore_rate: f64,
    pub total_reward: f64,
    pub average_reward: f64,
    /// Wall-clock seconds spent on this cycle.
    pub cycle_wall_time: f64,
    /// Nodes in the agent's environment model.
    pub model_size: usize,
}

const CSV_HEADER: &str = "cycle,observation,reward,action,explored,explore_rate,\
total_reward,average_reward,cycle_wall_time,model_size";

/// Buffered CSV writer for cycle records.
///
/// Contract: `create` writes the header, each `write_record` call appends
/// exactly one line.
pub struct CycleWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
}

impl CycleWriter {
    /// Create (truncating) the log file and write the header row.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, LogError> {
        Self::create_with_flush(path, 0)
    }

    /// `flush_every_lines = 0` disables periodic flushing.
    pub fn create_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, LogError> {
        let f = File::create(path)?;
        let mut writer = Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
        };
        writeln!(writer.w, "{CSV_HEADER}")?;
        Ok(writer)
    }

    pub fn write_record(&mut self, record: &CycleRecordV1) -> Result<(), LogError> {
        writeln!(
            self.w,
            "{},{},{},{},{},{},{},{},{},{}",
            record.cycle,
            record.observation,
            record.reward,
            record.action,
            record.explored,
            record.explore_rate,
            record.total_reward,
            record.average_reward,
            record.cycle_wall_time,
            record.model_size
        )?;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), LogError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }
}

/// End-of-run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummaryV1 {
    pub environment: String,
    pub seed: u64,
    pub cycles: u64,
    pub total_reward: f64,
    pub average_reward: f64,
    pub model_size: usize,
}

/// Write the summary as pretty JSON via a temp file and rename, so readers
/// never observe a partial file.
pub fn write_summary_atomic(path: impl AsRef<Path>, summary: &RunSummaryV1) -> Result<(), LogError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(summary)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

pub fn read_summary(path: impl AsRef<Path>) -> Result<RunSummaryV1, LogError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Milliseconds since the Unix epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
