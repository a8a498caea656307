//! Contingency table model and the random table generators.
//!
//! A [`ContingencyTable`] owns its labels and cell counts and upholds the
//! structural invariants the validator promises: 2 or 3 rows and columns,
//! unique digit-free titles, and no all-zero row or column. Derived values
//! (marginal sums, grand total, degrees of freedom, cell probabilities) are
//! computed on demand; the dimensions are fixed for the lifetime of the
//! table.

use rand::Rng;
use serde::Serialize;

use crate::validate::ValidationError;

/// Smallest accepted table dimension.
pub const MIN_DIM: usize = 2;
/// Largest accepted table dimension.
pub const MAX_DIM: usize = 3;

/// Label appended to the marginal row and column of a [`TotaledTable`].
pub const TOTAL_LABEL: &str = "Total";

// ---------------------------------------------------------------------------
// ContingencyTable
// ---------------------------------------------------------------------------

/// A validated contingency table of category-intersection counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContingencyTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    cells: Vec<Vec<u64>>,
}

impl ContingencyTable {
    /// Build a table, enforcing every structural invariant.
    ///
    /// This is the only constructor; the form validator and the save-file
    /// importer both funnel through it, so a `ContingencyTable` in hand is
    /// always well-formed.
    pub fn new(
        row_labels: Vec<String>,
        col_labels: Vec<String>,
        cells: Vec<Vec<u64>>,
    ) -> Result<Self, ValidationError> {
        let rows = row_labels.len();
        let cols = col_labels.len();
        if !(MIN_DIM..=MAX_DIM).contains(&rows)
            || !(MIN_DIM..=MAX_DIM).contains(&cols)
            || cells.len() != rows
            || cells.iter().any(|r| r.len() != cols)
        {
            return Err(ValidationError::BadShape {
                rows: cells.len(),
                cols: cells.first().map_or(0, Vec::len),
            });
        }

        let titles: Vec<&str> = row_labels
            .iter()
            .chain(col_labels.iter())
            .map(String::as_str)
            .collect();
        if titles.iter().any(|t| t.trim().is_empty()) {
            return Err(ValidationError::MissingCore);
        }
        if titles
            .iter()
            .any(|t| t.chars().any(|c| c.is_ascii_digit()))
        {
            return Err(ValidationError::TitleWithDigit);
        }
        let mut unique: Vec<String> = titles.iter().map(|t| t.trim().to_string()).collect();
        unique.sort();
        unique.dedup();
        if unique.len() != rows + cols {
            return Err(ValidationError::DuplicateTitles);
        }

        if cells.iter().any(|r| r.iter().all(|&v| v == 0)) {
            return Err(ValidationError::ZeroRow);
        }
        for j in 0..cols {
            if cells.iter().all(|r| r[j] == 0) {
                return Err(ValidationError::ZeroColumn);
            }
        }

        Ok(Self {
            row_labels,
            col_labels,
            cells,
        })
    }

    /// `(rows, cols)` of the data block.
    pub fn shape(&self) -> (usize, usize) {
        (self.row_labels.len(), self.col_labels.len())
    }

    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    pub fn cells(&self) -> &[Vec<u64>] {
        &self.cells
    }

    /// Marginal sums per row.
    pub fn row_sums(&self) -> Vec<u64> {
        self.cells.iter().map(|r| r.iter().sum()).collect()
    }

    /// Marginal sums per column.
    pub fn col_sums(&self) -> Vec<u64> {
        let (_, cols) = self.shape();
        (0..cols)
            .map(|j| self.cells.iter().map(|r| r[j]).sum())
            .collect()
    }

    /// Sum over every cell.
    pub fn grand_total(&self) -> u64 {
        self.cells.iter().flatten().sum()
    }

    /// Degrees of freedom of the independence test: `(rows-1)(cols-1)`.
    pub fn dof(&self) -> usize {
        let (rows, cols) = self.shape();
        (rows - 1) * (cols - 1)
    }

    /// Flattened cell probabilities (cell / grand total), row-major.
    pub fn cell_probabilities(&self) -> Vec<f64> {
        let total = self.grand_total() as f64;
        self.cells
            .iter()
            .flatten()
            .map(|&v| v as f64 / total)
            .collect()
    }

    /// The normalized table shown to the user: marginal sums appended as a
    /// "Total" row and column.
    pub fn with_totals(&self) -> TotaledTable {
        let row_sums = self.row_sums();
        let col_sums = self.col_sums();

        let mut cells: Vec<Vec<u64>> = self
            .cells
            .iter()
            .zip(&row_sums)
            .map(|(row, &sum)| {
                let mut r = row.clone();
                r.push(sum);
                r
            })
            .collect();
        let mut total_row = col_sums;
        total_row.push(self.grand_total());
        cells.push(total_row);

        let mut row_labels = self.row_labels.clone();
        row_labels.push(TOTAL_LABEL.to_string());
        let mut col_labels = self.col_labels.clone();
        col_labels.push(TOTAL_LABEL.to_string());

        TotaledTable {
            row_labels,
            col_labels,
            cells,
        }
    }

    /// Random 2×2 table in the shape of the original "Random 2x2" mode:
    /// Men/Women against Democrats/Republicans, cells uniform in 211..=225.
    pub fn random_2x2(rng: &mut impl Rng) -> Self {
        let cells = (0..2)
            .map(|_| (0..2).map(|_| rng.random_range(211..=225)).collect())
            .collect();
        Self::new(
            vec!["Men".to_string(), "Women".to_string()],
            vec!["Democrats".to_string(), "Republicans".to_string()],
            cells,
        )
        .expect("generated cells are positive")
    }

    /// Random 3×3 table: adds Undeclared/Independent, cells uniform in 94..=100.
    pub fn random_3x3(rng: &mut impl Rng) -> Self {
        let cells = (0..3)
            .map(|_| (0..3).map(|_| rng.random_range(94..=100)).collect())
            .collect();
        Self::new(
            vec![
                "Men".to_string(),
                "Women".to_string(),
                "Undeclared".to_string(),
            ],
            vec![
                "Democrats".to_string(),
                "Republicans".to_string(),
                "Independent".to_string(),
            ],
            cells,
        )
        .expect("generated cells are positive")
    }
}

// ---------------------------------------------------------------------------
// TotaledTable
// ---------------------------------------------------------------------------

/// A contingency table with its marginal sums appended.
///
/// `cells` is `(rows+1) x (cols+1)`; the last row and column hold the
/// marginal sums and the bottom-right corner the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TotaledTable {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<u64>>,
}

// ---------------------------------------------------------------------------
// SampleSize
// ---------------------------------------------------------------------------

/// A validated resampling size: positive, a multiple of 10, and no larger
/// than the grand total of the table it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SampleSize(u64);

impl SampleSize {
    /// Per-draw sizes accepted by the original form: multiples of 10 only.
    pub const STEP: u64 = 10;

    pub fn new(value: u64, grand_total: u64) -> Result<Self, ValidationError> {
        if value == 0 {
            return Err(ValidationError::ZeroSampleSize);
        }
        if value > grand_total {
            return Err(ValidationError::SampleSizeTooLarge);
        }
        if value % Self::STEP != 0 {
            return Err(ValidationError::SampleSizeNotMultipleOfTen);
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SampleSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn men_women_table() -> ContingencyTable {
        ContingencyTable::new(
            vec!["Men".into(), "Women".into()],
            vec!["Democrats".into(), "Republicans".into()],
            vec![vec![10, 10], vec![10, 10]],
        )
        .unwrap()
    }

    #[test]
    fn test_derived_sums() {
        let table = men_women_table();
        assert_eq!(table.row_sums(), vec![20, 20]);
        assert_eq!(table.col_sums(), vec![20, 20]);
        assert_eq!(table.grand_total(), 40);
        assert_eq!(table.dof(), 1);
    }

    #[test]
    fn test_cell_probabilities_sum_to_one() {
        let table = ContingencyTable::new(
            vec!["Men".into(), "Women".into()],
            vec!["Democrats".into(), "Republicans".into()],
            vec![vec![3, 9], vec![6, 2]],
        )
        .unwrap();
        let probs = table.cell_probabilities();
        assert_eq!(probs.len(), 4);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!((probs[0] - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_with_totals_matches_marginals() {
        let table = ContingencyTable::new(
            vec!["Men".into(), "Women".into()],
            vec!["Democrats".into(), "Republicans".into()],
            vec![vec![5, 7], vec![11, 3]],
        )
        .unwrap();
        let totaled = table.with_totals();
        assert_eq!(totaled.row_labels.last().unwrap(), TOTAL_LABEL);
        assert_eq!(totaled.col_labels.last().unwrap(), TOTAL_LABEL);
        assert_eq!(totaled.cells[0], vec![5, 7, 12]);
        assert_eq!(totaled.cells[1], vec![11, 3, 14]);
        assert_eq!(totaled.cells[2], vec![16, 10, 26]);
    }

    #[test]
    fn test_rejects_zero_row_and_column() {
        let zero_row = ContingencyTable::new(
            vec!["A".into(), "B".into()],
            vec!["C".into(), "D".into()],
            vec![vec![0, 0], vec![1, 2]],
        );
        assert_eq!(zero_row, Err(ValidationError::ZeroRow));

        let zero_col = ContingencyTable::new(
            vec!["A".into(), "B".into()],
            vec!["C".into(), "D".into()],
            vec![vec![0, 3], vec![0, 2]],
        );
        assert_eq!(zero_col, Err(ValidationError::ZeroColumn));
    }

    #[test]
    fn test_rejects_bad_titles() {
        let digits = ContingencyTable::new(
            vec!["Group1".into(), "B".into()],
            vec!["C".into(), "D".into()],
            vec![vec![1, 1], vec![1, 1]],
        );
        assert_eq!(digits, Err(ValidationError::TitleWithDigit));

        let duplicate = ContingencyTable::new(
            vec!["Men".into(), "B".into()],
            vec!["Men".into(), "D".into()],
            vec![vec![1, 1], vec![1, 1]],
        );
        assert_eq!(duplicate, Err(ValidationError::DuplicateTitles));
    }

    #[test]
    fn test_rejects_bad_shape() {
        let too_wide = ContingencyTable::new(
            vec!["A".into(), "B".into()],
            vec!["C".into(), "D".into(), "E".into(), "F".into()],
            vec![vec![1, 1, 1, 1], vec![1, 1, 1, 1]],
        );
        assert!(matches!(too_wide, Err(ValidationError::BadShape { .. })));

        let ragged = ContingencyTable::new(
            vec!["A".into(), "B".into()],
            vec!["C".into(), "D".into()],
            vec![vec![1, 1], vec![1]],
        );
        assert!(matches!(ragged, Err(ValidationError::BadShape { .. })));
    }

    #[test]
    fn test_random_tables_are_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let small = ContingencyTable::random_2x2(&mut rng);
        assert_eq!(small.shape(), (2, 2));
        for &v in small.cells().iter().flatten() {
            assert!((211..=225).contains(&v));
        }

        let large = ContingencyTable::random_3x3(&mut rng);
        assert_eq!(large.shape(), (3, 3));
        assert_eq!(large.dof(), 4);
        for &v in large.cells().iter().flatten() {
            assert!((94..=100).contains(&v));
        }
    }

    #[test]
    fn test_sample_size_rules() {
        assert_eq!(SampleSize::new(20, 40).unwrap().get(), 20);
        assert_eq!(
            SampleSize::new(0, 40),
            Err(ValidationError::ZeroSampleSize)
        );
        assert_eq!(
            SampleSize::new(50, 40),
            Err(ValidationError::SampleSizeTooLarge)
        );
        assert_eq!(
            SampleSize::new(15, 40),
            Err(ValidationError::SampleSizeNotMultipleOfTen)
        );
        // Exactly the grand total is allowed.
        assert!(SampleSize::new(40, 40).is_ok());
    }
}
