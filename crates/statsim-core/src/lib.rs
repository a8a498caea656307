//! # statsim-core
//!
//! Core library for the statsim teaching tool: the two classical-test
//! simulation flows of the original application, stripped of their GUI.
//!
//! ## Quick Start
//!
//! ```no_run
//! use statsim_core::{ChiSimulation, ContingencyTable, SampleSize};
//!
//! let mut rng = rand::rng();
//! let table = ContingencyTable::random_2x2(&mut rng);
//! let sample_size = SampleSize::new(100, table.grand_total()).unwrap();
//!
//! let mut sim = ChiSimulation::new(table, sample_size);
//! let report = sim.run_batch(1000, &mut rng).unwrap();
//! println!("{} draws kept, {} degenerate", report.completed, report.skipped);
//!
//! let hist = sim.tracker().histogram();
//! assert_eq!(hist.counts.len(), 50);
//! ```
//!
//! ## Architecture
//!
//! Validation → Resampling → Accumulation
//!
//! - [`validate`] turns the raw entry grid plus a sample-size string into a
//!   [`ContingencyTable`] and [`SampleSize`], reporting the first failing
//!   check as a single status message.
//! - [`resample`] draws `sample_size` categorical samples weighted by the
//!   table's cells and hands the tabulated counts to the chi-square routine.
//! - [`tracker`] accumulates the statistic of every kept draw and renders
//!   the 50-bin histogram with its theoretical overlay.
//!
//! [`session::ChiSimulation`] ties the three stages together; [`ttest`] is
//! the second, independent flow over imported or generated numeric samples;
//! [`store`] covers the save-file and CSV import formats.

pub mod resample;
pub mod session;
pub mod store;
pub mod table;
pub mod tracker;
pub mod ttest;
pub mod validate;

pub use resample::{ResamplingEngine, SimulationRun};
pub use session::{BatchReport, ChiSimulation, MAX_TOTAL_RUNS, RunError};
pub use store::{
    SAVE_FILE_NAME, SavedTable, default_save_path, export_table, import_table, read_sample_csv,
};
pub use table::{ContingencyTable, SampleSize, TotaledTable};
pub use tracker::{HISTOGRAM_BINS, Histogram, OverlayPoint, RunTracker};
pub use ttest::{PairSummary, SIGNIFICANCE_LEVEL, SamplePair, TTestReport};
pub use validate::{TableForm, ValidationError, validate_form};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
