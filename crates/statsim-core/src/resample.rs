//! Categorical resampling of a contingency table.
//!
//! One draw samples `sample_size` independent cell indices weighted by the
//! table's cell counts, tabulates them into a matrix of the table's shape
//! (unselected cells count 0), and hands the counts to the chi-square
//! routine. A draw can be structurally degenerate, with an empty row or
//! column in the resampled matrix; that surfaces as a recoverable
//! [`StatError`] rather than a panic.

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::Serialize;

use statsim_stats::{StatError, chi2_contingency};

use crate::table::{ContingencyTable, SampleSize};

/// One completed resample draw and its chi-square statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationRun {
    /// Resampled counts, same shape as the source table; always sums to the
    /// sample size.
    pub counts: Vec<Vec<u64>>,
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
}

/// Draws repeated categorical samples from a fixed table distribution.
pub struct ResamplingEngine {
    weights: WeightedIndex<u64>,
    shape: (usize, usize),
    sample_size: u64,
}

impl ResamplingEngine {
    /// Build an engine over the table's flattened cell distribution.
    pub fn new(table: &ContingencyTable, sample_size: SampleSize) -> Self {
        let flat: Vec<u64> = table.cells().iter().flatten().copied().collect();
        // A validated table always has a positive grand total.
        let weights = WeightedIndex::new(flat).expect("table has a positive grand total");
        Self {
            weights,
            shape: table.shape(),
            sample_size: sample_size.get(),
        }
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    /// One draw: tabulated counts in the shape of the source table.
    pub fn draw(&self, rng: &mut impl Rng) -> Vec<Vec<u64>> {
        let (rows, cols) = self.shape;
        let mut counts = vec![vec![0u64; cols]; rows];
        for _ in 0..self.sample_size {
            let idx = self.weights.sample(rng);
            counts[idx / cols][idx % cols] += 1;
        }
        counts
    }

    /// One draw plus its chi-square statistic.
    ///
    /// A degenerate draw (zero row/column) is reported, not panicked on;
    /// batch drivers skip it and keep going.
    pub fn run(&self, rng: &mut impl Rng) -> Result<SimulationRun, StatError> {
        let counts = self.draw(rng);
        let test = chi2_contingency(&counts)?;
        Ok(SimulationRun {
            counts,
            statistic: test.statistic,
            p_value: test.p_value,
            dof: test.dof,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
