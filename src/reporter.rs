//! Progress reporting
//!
//! The engine never persists anything itself. Level completions and on-demand
//! progress flushes are handed to a `ProgressReporter`, which forwards them to
//! whatever stores player progress outside the game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::GameStats;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("progress sink unavailable: {0}")]
    Unavailable(String),
    #[error("progress rejected: {0}")]
    Rejected(String),
}

/// Unflushed progress for the current session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub total_keys_collected: u64,
    pub session_score: u64,
    pub high_score: u64,
    pub level: u32,
}

impl ProgressReport {
    pub fn from_stats(stats: &GameStats) -> Self {
        Self {
            total_keys_collected: stats.total_keys_collected,
            session_score: stats.session_score,
            high_score: stats.high_score,
            level: stats.level,
        }
    }

    pub fn has_new_keys(&self) -> bool {
        self.total_keys_collected > 0
    }

    pub fn has_new_high_score(&self) -> bool {
        self.session_score > self.high_score
    }

    /// Level 1 is the default and never needs saving
    pub fn needs_level_update(&self) -> bool {
        self.level > 1
    }

    /// Whether anything is worth sending
    pub fn has_progress(&self) -> bool {
        self.has_new_keys() || self.has_new_high_score() || self.needs_level_update()
    }
}

/// Sink for session progress
pub trait ProgressReporter {
    /// Called once when the last round of a level is cleared
    fn report_level_complete(&mut self, new_level: u32, total_score: u64) -> Result<(), ReportError>;

    /// Called when the driver flushes accumulated progress
    fn report_progress(&mut self, report: &ProgressReport) -> Result<(), ReportError>;
}

/// Reporter that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ProgressReporter for LogReporter {
    fn report_level_complete(&mut self, new_level: u32, total_score: u64) -> Result<(), ReportError> {
        log::info!("Level progress: now level {}, score {}", new_level, total_score);
        Ok(())
    }

    fn report_progress(&mut self, report: &ProgressReport) -> Result<(), ReportError> {
        log::info!(
            "Progress: {} keys, session score {}, high score {}, level {}",
            report.total_keys_collected,
            report.session_score,
            report.high_score,
            report.level
        );
        Ok(())
    }
}

/// Reporter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report_level_complete(&mut self, _new_level: u32, _total_score: u64) -> Result<(), ReportError> {
        Ok(())
    }

    fn report_progress(&mut self, _report: &ProgressReport) -> Result<(), ReportError> {
        Ok(())
    }
}
