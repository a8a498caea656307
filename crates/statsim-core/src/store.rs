//! Save-file and CSV import formats.
//!
//! # Storage Format
//!
//! A chi-square save file is a single JSON document holding the contingency
//! matrix, its labels, and the validated sample size. The default location
//! is `save.stat` on the current user's desktop, matching the original's
//! fixed-path export. Imported documents re-validate every table invariant
//! before use.
//!
//! The t-test flow imports a plain-text CSV with exactly two numeric
//! columns; the header row is dropped and empty cells are skipped per
//! column, so the two samples may end up with different lengths.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::table::{ContingencyTable, SampleSize};
use crate::ttest::SamplePair;

/// File name of the fixed-path save file.
pub const SAVE_FILE_NAME: &str = "save.stat";

const SAVE_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Save file (chi-square flow)
// ---------------------------------------------------------------------------

/// On-disk form of a saved table plus sample size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTable {
    pub version: u32,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub cells: Vec<Vec<u64>>,
    pub sample_size: u64,
}

/// Default save location: `Desktop/save.stat` in the user's home directory.
pub fn default_save_path() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join("Desktop").join(SAVE_FILE_NAME)
}

/// Write a table and its sample size to `path`.
pub fn export_table(
    path: &Path,
    table: &ContingencyTable,
    sample_size: SampleSize,
) -> io::Result<()> {
    let doc = SavedTable {
        version: SAVE_VERSION,
        row_labels: table.row_labels().to_vec(),
        col_labels: table.col_labels().to_vec(),
        cells: table.cells().to_vec(),
        sample_size: sample_size.get(),
    };
    let json = serde_json::to_string_pretty(&doc).map_err(io::Error::other)?;
    fs::write(path, json)?;
    info!("exported table to {}", path.display());
    Ok(())
}

/// Read a table and sample size back from `path`.
///
/// The document's table data goes through the same constructor as form
/// input, so a hand-edited file cannot smuggle in an invalid table.
pub fn import_table(path: &Path) -> io::Result<(ContingencyTable, SampleSize)> {
    let json = fs::read_to_string(path)?;
    let doc: SavedTable = serde_json::from_str(&json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if doc.version != SAVE_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported save version {}", doc.version),
        ));
    }

    let table = ContingencyTable::new(doc.row_labels, doc.col_labels, doc.cells)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;
    let sample_size = SampleSize::new(doc.sample_size, table.grand_total())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    info!("imported table from {}", path.display());
    Ok((table, sample_size))
}

// ---------------------------------------------------------------------------
// CSV import (t-test flow)
// ---------------------------------------------------------------------------

/// Read a two-column numeric CSV into a [`SamplePair`].
///
/// The first line is a header and is dropped. Empty cells are skipped, so
/// the columns may differ in length; any non-empty cell that fails to parse
/// as a number is an error, as is any line with more than two fields.
pub fn read_sample_csv(path: &Path) -> io::Result<SamplePair> {
    let text = fs::read_to_string(path)?;
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.len() < 2 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "file has no data rows",
        ));
    }

    let width = lines
        .iter()
        .map(|l| l.split(',').count())
        .max()
        .unwrap_or(0);
    if width != 2 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "file must have 2 columns",
        ));
    }

    let mut a = Vec::new();
    let mut b = Vec::new();
    for line in &lines[1..] {
        for (col, field) in line.split(',').enumerate() {
            let field = field.trim();
            if field.is_empty() {
                continue;
            }
            let value: f64 = field.parse().map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidData, "file must have only numbers")
            })?;
            if col == 0 {
                a.push(value);
            } else {
                b.push(value);
            }
        }
    }

    Ok(SamplePair::new(a, b))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
