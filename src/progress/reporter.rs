//! Progress reporter
//!
//! Counts completed work units against the total for the current job.
//! Completed units never go backwards between two resets.

use std::time::{Duration, Instant};

/// Status text shown before any job has run
pub const READY_STATUS: &str = "Ready";

/// Progress tracker for one analysis job
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    completed_units: usize,
    total_units: usize,
    status: String,
    started_at: Instant,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            completed_units: 0,
            total_units: 0,
            status: READY_STATUS.to_string(),
            started_at: Instant::now(),
        }
    }

    /// Start counting for a new job
    pub fn reset(&mut self, total_units: usize, status: impl Into<String>) {
        self.completed_units = 0;
        self.total_units = total_units;
        self.status = status.into();
        self.started_at = Instant::now();
    }

    /// Record finished units, clamped to the total
    pub fn advance(&mut self, units: usize) {
        self.completed_units = (self.completed_units + units).min(self.total_units);
    }

    /// Raise the completed count to `completed` if it is higher
    pub fn advance_to(&mut self, completed: usize) {
        if completed > self.completed_units {
            self.completed_units = completed.min(self.total_units);
        }
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn completed_units(&self) -> usize {
        self.completed_units
    }

    pub fn total_units(&self) -> usize {
        self.total_units
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Fraction done in [0.0, 1.0]; 0.0 when there is no work
    pub fn percentage(&self) -> f64 {
        if self.total_units == 0 {
            0.0
        } else {
            self.completed_units as f64 / self.total_units as f64
        }
    }

    /// Time since the last reset
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            completed_units: self.completed_units,
            total_units: self.total_units,
            status: self.status.clone(),
            percentage: self.percentage(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress state handed to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub completed_units: usize,
    pub total_units: usize,
    pub status: String,
    pub percentage: f64,
}

impl ProgressSnapshot {
    /// Format as human-readable string
    pub fn format(&self) -> String {
        format!(
            "{} ({}/{}, {:.1}%)",
            self.status,
            self.completed_units,
            self.total_units,
            self.percentage * 100.0
        )
    }
}
