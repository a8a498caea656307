//! The chi-square simulation session.
//!
//! A [`ChiSimulation`] is the validated state of one table-plus-sample-size
//! choice: it owns the resampling engine and the run history, and drives
//! single draws and synchronous batches. Table dimensions and degrees of
//! freedom are fixed for the session's lifetime; picking a new table means
//! building a new session.

use log::debug;
use rand::Rng;
use serde::Serialize;

use statsim_stats::StatError;

use crate::resample::{ResamplingEngine, SimulationRun};
use crate::table::{ContingencyTable, SampleSize};
use crate::tracker::RunTracker;

/// Ceiling on accumulated runs per session. Past this point further
/// simulation is refused (display-performance limit in the original).
pub const MAX_TOTAL_RUNS: u64 = 10_000;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a run request produced no statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunError {
    /// The session has accumulated [`MAX_TOTAL_RUNS`] attempts.
    CeilingReached,
    /// The draw was structurally degenerate; it was counted but not recorded.
    Degenerate(StatError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CeilingReached => {
                write!(f, "run ceiling of {MAX_TOTAL_RUNS} reached, start a new session")
            }
            Self::Degenerate(e) => write!(f, "Error: {e}"),
        }
    }
}

impl std::error::Error for RunError {}

// ---------------------------------------------------------------------------
// Batch report
// ---------------------------------------------------------------------------

/// Outcome of a synchronous batch of draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub attempted: u64,
    pub completed: u64,
    /// Degenerate draws: skipped and excluded from the run history.
    pub skipped: u64,
}

// ---------------------------------------------------------------------------
// ChiSimulation
// ---------------------------------------------------------------------------

/// One validated simulation session over a fixed contingency table.
pub struct ChiSimulation {
    table: ContingencyTable,
    sample_size: SampleSize,
    engine: ResamplingEngine,
    tracker: RunTracker,
    total_runs: u64,
}

impl ChiSimulation {
    pub fn new(table: ContingencyTable, sample_size: SampleSize) -> Self {
        let engine = ResamplingEngine::new(&table, sample_size);
        Self {
            table,
            sample_size,
            engine,
            tracker: RunTracker::new(),
            total_runs: 0,
        }
    }

    pub fn table(&self) -> &ContingencyTable {
        &self.table
    }

    pub fn sample_size(&self) -> SampleSize {
        self.sample_size
    }

    pub fn dof(&self) -> usize {
        self.table.dof()
    }

    pub fn tracker(&self) -> &RunTracker {
        &self.tracker
    }

    /// Attempted runs so far, including degenerate draws.
    pub fn total_runs(&self) -> u64 {
        self.total_runs
    }

    /// Whether further simulation is allowed.
    pub fn can_run(&self) -> bool {
        self.total_runs < MAX_TOTAL_RUNS
    }

    /// One draw. On success the statistic is appended to the history; a
    /// degenerate draw still counts as an attempt but records nothing.
    pub fn run_once(&mut self, rng: &mut impl Rng) -> Result<SimulationRun, RunError> {
        if !self.can_run() {
            return Err(RunError::CeilingReached);
        }
        self.total_runs += 1;
        match self.engine.run(rng) {
            Ok(run) => {
                self.tracker.push(run.statistic);
                Ok(run)
            }
            Err(e) => {
                debug!("degenerate draw skipped: {e}");
                Err(RunError::Degenerate(e))
            }
        }
    }

    /// Run `n` draws to completion, skipping degenerate draws without
    /// aborting. The attempt counter advances by the full batch size; only
    /// the ceiling check at the start gates the batch.
    pub fn run_batch(&mut self, n: u64, rng: &mut impl Rng) -> Result<BatchReport, RunError> {
        if !self.can_run() {
            return Err(RunError::CeilingReached);
        }

        let mut skipped = 0;
        for _ in 0..n {
            match self.engine.run(rng) {
                Ok(run) => self.tracker.push(run.statistic),
                Err(e) => {
                    debug!("degenerate draw skipped: {e}");
                    skipped += 1;
                }
            }
        }
        self.total_runs += n;

        Ok(BatchReport {
            attempted: n,
            completed: n - skipped,
            skipped,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
