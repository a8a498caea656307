//! The two-sample t-test flow.
//!
//! A [`SamplePair`] holds the two numeric samples — imported from CSV or
//! generated from shifted normal distributions — and produces the summary
//! table and pooled t-test the original displayed.

use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;

use statsim_stats::{StatError, mean, sample_variance, ttest_ind};

/// Two-sided significance threshold for the verdict label.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Mean of generated samples.
const RANDOM_MEAN: f64 = 50.0;
/// Standard deviation of generated samples.
const RANDOM_STD: f64 = 5.0;

// ---------------------------------------------------------------------------
// SamplePair
// ---------------------------------------------------------------------------

/// Two independent numeric samples. Lengths may differ.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePair {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl SamplePair {
    pub fn new(a: Vec<f64>, b: Vec<f64>) -> Self {
        Self { a, b }
    }

    /// Random mode: `a ~ Normal(50, 5)`, `b ~ Normal(50, 5)` plus an integer
    /// shift in -4..=4, each with an independent length in 20..=60.
    pub fn random(rng: &mut impl Rng) -> Self {
        let len_a = rng.random_range(20..=60);
        let len_b = rng.random_range(20..=60);
        let shift = rng.random_range(-4..=4) as f64;

        let a = (0..len_a)
            .map(|_| RANDOM_MEAN + RANDOM_STD * sample_standard_normal(rng))
            .collect();
        let b = (0..len_b)
            .map(|_| RANDOM_MEAN + RANDOM_STD * sample_standard_normal(rng) + shift)
            .collect();
        Self { a, b }
    }

    /// The three-row summary the original tabulated: mean, Bessel-corrected
    /// variance, and element count per sample.
    pub fn summary(&self) -> PairSummary {
        PairSummary {
            mean_a: mean(&self.a),
            mean_b: mean(&self.b),
            variance_a: sample_variance(&self.a),
            variance_b: sample_variance(&self.b),
            len_a: self.a.len(),
            len_b: self.b.len(),
        }
    }

    /// `n1 + n2 - 2`.
    pub fn dof(&self) -> usize {
        (self.a.len() + self.b.len()).saturating_sub(2)
    }

    /// Pooled two-sample t-test with the significance verdict attached.
    pub fn test(&self) -> Result<TTestReport, StatError> {
        let result = ttest_ind(&self.a, &self.b)?;
        Ok(TTestReport {
            statistic: result.statistic,
            p_value: result.p_value,
            dof: result.dof,
            significant: result.p_value < SIGNIFICANCE_LEVEL,
        })
    }
}

/// Per-sample summary statistics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PairSummary {
    pub mean_a: f64,
    pub mean_b: f64,
    pub variance_a: f64,
    pub variance_b: f64,
    pub len_a: usize,
    pub len_b: usize,
}

/// t-test result plus the verdict shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestReport {
    pub statistic: f64,
    pub p_value: f64,
    pub dof: usize,
    pub significant: bool,
}

impl TTestReport {
    pub fn verdict(&self) -> &'static str {
        if self.significant {
            "Significant"
        } else {
            "Insignificant"
        }
    }
}

/// Box-Muller standard normal draw.
fn sample_standard_normal(rng: &mut impl Rng) -> f64 {
    let u1 = rng.random::<f64>().clamp(f64::MIN_POSITIVE, 1.0);
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
