//! Entry-form validation for the chi-square flow.
//!
//! The original form is a 4×4 entry grid (row 0 and column 0 hold titles,
//! the top-left cell is dead) plus one sample-size field. [`validate_form`]
//! replays the form's checks in their original order; the first failing
//! check wins and is reported as a single status message, never an
//! aggregate.

use crate::table::{ContingencyTable, SampleSize};

/// Side length of the raw entry grid (titles plus up to 3 data rows/cols).
pub const GRID_DIM: usize = 4;

// ---------------------------------------------------------------------------
// Form input
// ---------------------------------------------------------------------------

/// Raw, untrusted form input: the entry grid and the sample-size field.
///
/// `grid` rows beyond [`GRID_DIM`] are ignored; missing trailing cells are
/// treated as empty entries.
#[derive(Debug, Clone, Default)]
pub struct TableForm {
    pub grid: Vec<Vec<String>>,
    pub sample_size: String,
}

impl TableForm {
    /// Trimmed cell at `(row, col)`, empty string when absent.
    fn cell(&self, row: usize, col: usize) -> &str {
        self.grid
            .get(row)
            .and_then(|r| r.get(col))
            .map_or("", |s| s.trim())
    }

    fn is_filled(&self, row: usize, col: usize) -> bool {
        !self.cell(row, col).is_empty()
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// One distinct variant per reported failure; `Display` renders the
/// user-visible status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The titled 2×2 core block is not fully present.
    MissingCore,
    /// A 3rd row is started but not completed.
    PartialRow,
    /// A 3rd column is started but not completed.
    PartialColumn,
    /// Both a 3rd row and 3rd column are present but their shared corner is empty.
    PartialCorner,
    /// A row or column title contains a digit.
    TitleWithDigit,
    /// Row and column titles are not mutually unique.
    DuplicateTitles,
    /// A cell value does not parse as a non-negative integer.
    NonIntegerCell,
    /// A data row sums to zero.
    ZeroRow,
    /// A data column sums to zero.
    ZeroColumn,
    /// The sample-size field is empty.
    MissingSampleSize,
    /// The sample-size field does not parse as an integer.
    NonIntegerSampleSize,
    /// The sample size is zero.
    ZeroSampleSize,
    /// The sample size exceeds the table's grand total.
    SampleSizeTooLarge,
    /// The sample size is not a multiple of 10.
    SampleSizeNotMultipleOfTen,
    /// Imported or programmatic table data has unsupported dimensions.
    BadShape { rows: usize, cols: usize },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCore => {
                write!(f, "Invalid, must have at least 2 rows and columns, with titles")
            }
            Self::PartialRow => write!(f, "Invalid, can't have a partial row"),
            Self::PartialColumn => write!(f, "Invalid, can't have a partial column"),
            Self::PartialCorner => write!(f, "Invalid, can't have partial rows / columns"),
            Self::TitleWithDigit => {
                write!(f, "Invalid, row and column titles may not have numbers in them")
            }
            Self::DuplicateTitles => {
                write!(f, "Invalid, row and column titles must all be unique")
            }
            Self::NonIntegerCell => write!(f, "Invalid, data values need to be integers"),
            Self::ZeroRow => write!(f, "Invalid, may not have null rows"),
            Self::ZeroColumn => write!(f, "Invalid, may not have null columns"),
            Self::MissingSampleSize => write!(f, "Invalid, sample size must be given"),
            Self::NonIntegerSampleSize => write!(f, "Invalid, sample size must be an integer"),
            Self::ZeroSampleSize => write!(f, "Invalid, sample size must be positive"),
            Self::SampleSizeTooLarge => write!(
                f,
                "Invalid, sample size must be smaller than the number of data points"
            ),
            Self::SampleSizeNotMultipleOfTen => {
                write!(f, "Invalid, sample size must be a multiple of 10")
            }
            Self::BadShape { rows, cols } => {
                write!(f, "Invalid, table must be between 2x2 and 3x3, got {rows}x{cols}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a raw form and build the normalized table and sample size.
///
/// Check order:
/// 1. titled 2×2 core present;
/// 2. no partial 3rd row / 3rd column / shared corner;
/// 3. titles digit-free;
/// 4. titles mutually unique;
/// 5. cells parse as integers;
/// 6. no zero row or column;
/// 7. sample size present, integer, positive, at most the grand total,
///    a multiple of 10.
pub fn validate_form(form: &TableForm) -> Result<(ContingencyTable, SampleSize), ValidationError> {
    // 1. Core block: titles for 2 rows and 2 columns plus their 4 cells.
    let core = [(0, 1), (0, 2), (1, 0), (2, 0), (1, 1), (1, 2), (2, 1), (2, 2)];
    if core.iter().any(|&(r, c)| !form.is_filled(r, c)) {
        return Err(ValidationError::MissingCore);
    }

    // 2. Shape detection: a started 3rd row/column must be complete.
    let mut rows = 2;
    let mut cols = 2;
    let third_row_started = (0..GRID_DIM).any(|c| form.is_filled(3, c));
    if third_row_started {
        if !(form.is_filled(3, 0) && form.is_filled(3, 1) && form.is_filled(3, 2)) {
            return Err(ValidationError::PartialRow);
        }
        rows = 3;
    }
    let third_col_started = (0..GRID_DIM).any(|r| form.is_filled(r, 3));
    if third_col_started {
        if !(form.is_filled(0, 3) && form.is_filled(1, 3) && form.is_filled(2, 3)) {
            return Err(ValidationError::PartialColumn);
        }
        cols = 3;
    }
    if rows == 3 && cols == 3 && !form.is_filled(3, 3) {
        return Err(ValidationError::PartialCorner);
    }

    // 3. Titles contain no digits.
    let col_titles: Vec<&str> = (1..=cols).map(|c| form.cell(0, c)).collect();
    let row_titles: Vec<&str> = (1..=rows).map(|r| form.cell(r, 0)).collect();
    for title in row_titles.iter().chain(col_titles.iter()) {
        if title.chars().any(|c| c.is_ascii_digit()) {
            return Err(ValidationError::TitleWithDigit);
        }
    }

    // 4. Titles are mutually unique.
    let mut titles: Vec<&str> = row_titles.iter().chain(col_titles.iter()).copied().collect();
    titles.sort_unstable();
    titles.dedup();
    if titles.len() != rows + cols {
        return Err(ValidationError::DuplicateTitles);
    }

    // 5. Cells parse as non-negative integers.
    let mut cells = vec![vec![0u64; cols]; rows];
    for (i, row) in cells.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = form
                .cell(i + 1, j + 1)
                .parse()
                .map_err(|_| ValidationError::NonIntegerCell)?;
        }
    }

    // 6. No zero rows or columns.
    if cells.iter().any(|r| r.iter().all(|&v| v == 0)) {
        return Err(ValidationError::ZeroRow);
    }
    if (0..cols).any(|j| cells.iter().all(|r| r[j] == 0)) {
        return Err(ValidationError::ZeroColumn);
    }

    // 7. Sample size.
    let raw_sample = form.sample_size.trim();
    if raw_sample.is_empty() {
        return Err(ValidationError::MissingSampleSize);
    }
    let sample: u64 = raw_sample
        .parse()
        .map_err(|_| ValidationError::NonIntegerSampleSize)?;
    let grand_total: u64 = cells.iter().flatten().sum();
    let sample_size = SampleSize::new(sample, grand_total)?;

    let table = ContingencyTable::new(
        row_titles.iter().map(|t| t.to_string()).collect(),
        col_titles.iter().map(|t| t.to_string()).collect(),
        cells,
    )?;

    Ok((table, sample_size))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
