//! Statistical routines backing the simulation flows.
//!
//! Thin, deterministic wrappers around `statrs`: the Pearson chi-square test
//! of independence (no Yates correction) and the independent two-sample
//! t-test with pooled variance, plus the density and quantile helpers used
//! to overlay theoretical curves on simulated histograms.

use statrs::distribution::{ChiSquared, Continuous, ContinuousCDF, Normal, StudentsT};

// ═══════════════════════════════════════════════════════════════════════════════
// Core types
// ═══════════════════════════════════════════════════════════════════════════════

/// Result of a chi-square test of independence on a contingency matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareTest {
    pub statistic: f64,
    pub p_value: f64,
    /// `(rows - 1) * (cols - 1)`.
    pub dof: usize,
    /// Expected frequencies under the independence hypothesis.
    pub expected: Vec<Vec<f64>>,
}

/// Result of an independent two-sample t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoSampleTTest {
    pub statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    /// `n1 + n2 - 2`.
    pub dof: usize,
}

/// Reasons a statistic cannot be computed.
///
/// `DegenerateRow`/`DegenerateColumn` are the recoverable resampling
/// failures: a single draw can produce a matrix with an empty margin even
/// though the source table never does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatError {
    /// A row of the observed matrix sums to zero.
    DegenerateRow(usize),
    /// A column of the observed matrix sums to zero.
    DegenerateColumn(usize),
    /// Not enough observations to form the statistic.
    InsufficientData { needed: usize, got: usize },
    /// Pooled variance is zero, the t statistic is undefined.
    ZeroVariance,
}

impl std::fmt::Display for StatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateRow(i) => write!(f, "got a 0 row (row {i})"),
            Self::DegenerateColumn(i) => write!(f, "got a 0 column (column {i})"),
            Self::InsufficientData { needed, got } => {
                write!(f, "insufficient data: need {needed}, got {got}")
            }
            Self::ZeroVariance => write!(f, "samples have zero pooled variance"),
        }
    }
}

impl std::error::Error for StatError {}

// ═══════════════════════════════════════════════════════════════════════════════
// Chi-square test of independence
// ═══════════════════════════════════════════════════════════════════════════════

/// Pearson chi-square test of independence on an observed count matrix.
///
/// Expected frequencies are `row_sum * col_sum / total`; the statistic is
/// `Σ (observed - expected)² / expected` with no continuity correction.
/// Fails with [`StatError::DegenerateRow`]/[`StatError::DegenerateColumn`]
/// when a margin sums to zero, since the expected matrix would contain a
/// zero element.
pub fn chi2_contingency(observed: &[Vec<u64>]) -> Result<ChiSquareTest, StatError> {
    let rows = observed.len();
    if rows < 2 {
        return Err(StatError::InsufficientData { needed: 2, got: rows });
    }
    let cols = observed[0].len();
    if cols < 2 {
        return Err(StatError::InsufficientData { needed: 2, got: cols });
    }
    if let Some(row) = observed.iter().find(|r| r.len() != cols) {
        return Err(StatError::InsufficientData {
            needed: cols,
            got: row.len(),
        });
    }

    let mut row_sums = vec![0u64; rows];
    let mut col_sums = vec![0u64; cols];
    for (i, row) in observed.iter().enumerate() {
        for (j, &v) in row.iter().enumerate() {
            row_sums[i] += v;
            col_sums[j] += v;
        }
    }
    if let Some(i) = row_sums.iter().position(|&s| s == 0) {
        return Err(StatError::DegenerateRow(i));
    }
    if let Some(j) = col_sums.iter().position(|&s| s == 0) {
        return Err(StatError::DegenerateColumn(j));
    }

    let total: u64 = row_sums.iter().sum();
    let total_f = total as f64;

    let mut statistic = 0.0;
    let mut expected = vec![vec![0.0f64; cols]; rows];
    for i in 0..rows {
        for j in 0..cols {
            let e = row_sums[i] as f64 * col_sums[j] as f64 / total_f;
            let diff = observed[i][j] as f64 - e;
            statistic += diff * diff / e;
            expected[i][j] = e;
        }
    }

    let dof = (rows - 1) * (cols - 1);
    let dist = ChiSquared::new(dof as f64).expect("dof >= 1");
    let p_value = dist.sf(statistic);

    Ok(ChiSquareTest {
        statistic,
        p_value,
        dof,
        expected,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Two-sample t-test
// ═══════════════════════════════════════════════════════════════════════════════

/// Independent two-sample t-test assuming equal population variances.
///
/// Uses the pooled variance estimator, `dof = n1 + n2 - 2`, and reports the
/// two-sided p-value.
pub fn ttest_ind(a: &[f64], b: &[f64]) -> Result<TwoSampleTTest, StatError> {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 {
        return Err(StatError::InsufficientData { needed: 2, got: n1 });
    }
    if n2 < 2 {
        return Err(StatError::InsufficientData { needed: 2, got: n2 });
    }

    let (m1, m2) = (mean(a), mean(b));
    let (v1, v2) = (sample_variance(a), sample_variance(b));

    let dof = n1 + n2 - 2;
    let pooled = ((n1 - 1) as f64 * v1 + (n2 - 1) as f64 * v2) / dof as f64;
    if pooled < 1e-300 {
        return Err(StatError::ZeroVariance);
    }

    let se = (pooled * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    let statistic = (m1 - m2) / se;

    let dist = StudentsT::new(0.0, 1.0, dof as f64).expect("dof >= 2");
    let p_value = 2.0 * dist.sf(statistic.abs());

    Ok(TwoSampleTTest {
        statistic,
        p_value,
        dof,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// Sample moments
// ═══════════════════════════════════════════════════════════════════════════════

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Bessel-corrected sample variance (ddof = 1). Zero below 2 elements.
pub fn sample_variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(data);
    data.iter().map(|&x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

// ═══════════════════════════════════════════════════════════════════════════════
// Density and quantile helpers
// ═══════════════════════════════════════════════════════════════════════════════

/// Chi-square density at `x` for `dof` degrees of freedom.
pub fn chi2_pdf(x: f64, dof: usize) -> f64 {
    if x <= 0.0 || dof == 0 {
        return 0.0;
    }
    ChiSquared::new(dof as f64).expect("dof >= 1").pdf(x)
}

/// Student's t density at `x` for `dof` degrees of freedom.
pub fn t_pdf(x: f64, dof: usize) -> f64 {
    if dof == 0 {
        return 0.0;
    }
    StudentsT::new(0.0, 1.0, dof as f64).expect("dof >= 1").pdf(x)
}

/// Student's t quantile (inverse CDF) at probability `q`.
pub fn t_ppf(q: f64, dof: usize) -> f64 {
    StudentsT::new(0.0, 1.0, dof as f64)
        .expect("dof >= 1")
        .inverse_cdf(q)
}

/// Normal density at `x` with the given mean and standard deviation.
pub fn norm_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    Normal::new(mean, std_dev).expect("std_dev > 0").pdf(x)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chi2_uniform_table_has_zero_statistic() {
        let observed = vec![vec![10, 10], vec![10, 10]];
        let result = chi2_contingency(&observed).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-12);
        assert_eq!(result.dof, 1);
        for row in &result.expected {
            for &e in row {
                assert!((e - 10.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_chi2_known_value() {
        // Row/col sums all 30, total 60, expected 15 per cell:
        // statistic = 4 * 25/15 = 6.6667, p ~ 0.0098 at 1 dof.
        let observed = vec![vec![10, 20], vec![20, 10]];
        let result = chi2_contingency(&observed).unwrap();
        assert!((result.statistic - 100.0 / 15.0).abs() < 1e-9);
        assert!(
            (result.p_value - 0.0098).abs() < 5e-4,
            "p = {}",
            result.p_value
        );
        assert_eq!(result.dof, 1);
    }

    #[test]
    fn test_chi2_3x3_dof() {
        let observed = vec![vec![10, 12, 9], vec![8, 11, 10], vec![9, 10, 12]];
        let result = chi2_contingency(&observed).unwrap();
        assert_eq!(result.dof, 4);
        assert!(result.statistic >= 0.0);
        assert!(result.p_value > 0.0 && result.p_value <= 1.0);
    }

    #[test]
    fn test_chi2_zero_column_is_degenerate() {
        let observed = vec![vec![5, 0], vec![7, 0]];
        assert_eq!(
            chi2_contingency(&observed),
            Err(StatError::DegenerateColumn(1))
        );
    }

    #[test]
    fn test_chi2_zero_row_is_degenerate() {
        let observed = vec![vec![0, 0], vec![7, 3]];
        assert_eq!(chi2_contingency(&observed), Err(StatError::DegenerateRow(0)));
    }

    #[test]
    fn test_chi2_too_small() {
        let observed = vec![vec![5, 5]];
        assert!(matches!(
            chi2_contingency(&observed),
            Err(StatError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_ttest_identical_samples() {
        let a = [4.0, 5.0, 6.0, 7.0];
        let result = ttest_ind(&a, &a).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-9);
        assert_eq!(result.dof, 6);
    }

    #[test]
    fn test_ttest_known_value() {
        // t = -3/sqrt(2/3) = -3.6742, dof 4, two-sided p ~ 0.0213.
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let result = ttest_ind(&a, &b).unwrap();
        assert!((result.statistic + 3.6742).abs() < 1e-3, "t = {}", result.statistic);
        assert!((result.p_value - 0.0213).abs() < 1e-3, "p = {}", result.p_value);
        assert_eq!(result.dof, 4);
    }

    #[test]
    fn test_ttest_is_symmetric() {
        let a = [12.0, 14.0, 11.0, 15.0, 13.0];
        let b = [9.0, 10.0, 8.0, 11.0];
        let ab = ttest_ind(&a, &b).unwrap();
        let ba = ttest_ind(&b, &a).unwrap();
        assert!((ab.statistic + ba.statistic).abs() < 1e-12);
        assert!((ab.p_value - ba.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_ttest_zero_variance() {
        let a = [5.0, 5.0, 5.0];
        let b = [5.0, 5.0, 5.0];
        assert_eq!(ttest_ind(&a, &b), Err(StatError::ZeroVariance));
    }

    #[test]
    fn test_ttest_insufficient_data() {
        let a = [1.0];
        let b = [2.0, 3.0];
        assert!(matches!(
            ttest_ind(&a, &b),
            Err(StatError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_mean_and_sample_variance() {
        let data = [2.0, 4.0, 6.0, 8.0];
        assert!((mean(&data) - 5.0).abs() < 1e-12);
        // Σ(x - 5)² = 9 + 1 + 1 + 9 = 20, / 3
        assert!((sample_variance(&data) - 20.0 / 3.0).abs() < 1e-12);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(sample_variance(&[3.0]), 0.0);
    }

    #[test]
    fn test_chi2_pdf_known_values() {
        // dof = 2: pdf(x) = exp(-x/2) / 2.
        assert!((chi2_pdf(1.0, 2) - 0.5 * (-0.5f64).exp()).abs() < 1e-9);
        assert_eq!(chi2_pdf(-1.0, 2), 0.0);
        assert_eq!(chi2_pdf(0.0, 1), 0.0);
    }

    #[test]
    fn test_t_pdf_is_symmetric() {
        let left = t_pdf(-1.5, 7);
        let right = t_pdf(1.5, 7);
        assert!((left - right).abs() < 1e-12);
        assert!(t_pdf(0.0, 7) > t_pdf(2.0, 7));
    }

    #[test]
    fn test_t_ppf_known_value() {
        // 97.5% quantile at 10 dof is 2.228.
        assert!((t_ppf(0.975, 10) - 2.228).abs() < 1e-3);
        assert!((t_ppf(0.025, 10) + 2.228).abs() < 1e-3);
    }

    #[test]
    fn test_norm_pdf_peak() {
        let peak = norm_pdf(50.0, 50.0, 5.0);
        assert!((peak - 1.0 / (5.0 * (2.0 * std::f64::consts::PI).sqrt())).abs() < 1e-9);
        assert!(norm_pdf(40.0, 50.0, 5.0) < peak);
    }
}
