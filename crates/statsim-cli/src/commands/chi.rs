//! `statsim chi` — chi-square independence simulation.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use statsim_core::{
    BatchReport, ChiSimulation, ContingencyTable, Histogram, MAX_TOTAL_RUNS, OverlayPoint,
    SampleSize, TotaledTable, export_table, import_table,
};
use statsim_stats::chi2_pdf;

use super::resolve_save_path;

/// Sample size attached to the generated random tables.
const RANDOM_SAMPLE_SIZE: u64 = 100;

const BAR_WIDTH: usize = 40;

pub struct ChiCommandConfig<'a> {
    pub random: Option<&'a str>,
    pub load: Option<&'a str>,
    pub runs: u64,
    pub seed: Option<u64>,
    pub export: Option<&'a str>,
    pub output: Option<&'a str>,
}

/// Machine-readable run report (`--output`).
#[derive(Serialize)]
struct ChiReport<'a> {
    table: TotaledTable,
    sample_size: u64,
    dof: usize,
    total_runs: u64,
    batch: BatchReport,
    mean: f64,
    histogram: Histogram,
    overlay: Vec<OverlayPoint>,
    values: &'a [f64],
}

/// Run the chi command.
pub fn run(cfg: ChiCommandConfig) {
    match cfg.seed {
        Some(seed) => run_with_rng(StdRng::seed_from_u64(seed), cfg),
        None => run_with_rng(rand::rng(), cfg),
    }
}

fn run_with_rng(mut rng: impl Rng, cfg: ChiCommandConfig) {
    // Pick the table source.
    let (table, sample_size) = match (cfg.random, cfg.load) {
        (Some(_), Some(_)) => {
            eprintln!("Error: --random and --load are mutually exclusive");
            std::process::exit(1);
        }
        (Some(dims), None) => {
            let table = if dims == "3" {
                ContingencyTable::random_3x3(&mut rng)
            } else {
                ContingencyTable::random_2x2(&mut rng)
            };
            let sample_size = SampleSize::new(RANDOM_SAMPLE_SIZE, table.grand_total())
                .expect("random tables hold well over 100 data points");
            (table, sample_size)
        }
        (None, Some(path)) => {
            let path = resolve_save_path(path);
            match import_table(&path) {
                Ok(loaded) => loaded,
                Err(e) => {
                    eprintln!("Error reading {}: {e}", path.display());
                    std::process::exit(1);
                }
            }
        }
        (None, None) => {
            eprintln!("Error: choose a table source with --random or --load");
            std::process::exit(1);
        }
    };

    if let Some(path) = cfg.export {
        let path = resolve_save_path(path);
        if let Err(e) = export_table(&path, &table, sample_size) {
            eprintln!("Error writing {}: {e}", path.display());
            std::process::exit(1);
        }
        println!("Exported table to {}", path.display());
    }

    print_table(&table, sample_size);

    let mut sim = ChiSimulation::new(table, sample_size);

    if cfg.runs == 1 {
        match sim.run_once(&mut rng) {
            Ok(run) => println!(
                "Chi Squared Value: {:.4}, degrees of freedom: {}, p-value: {:.4}",
                run.statistic, run.dof, run.p_value
            ),
            // Recoverable: the draw is counted but nothing is recorded.
            Err(e) => println!("{e}"),
        }
    } else if cfg.runs > 1 {
        let report = sim
            .run_batch(cfg.runs, &mut rng)
            .expect("fresh session is below the run ceiling");
        println!(
            "Ran {} draws: {} kept, {} degenerate (total runs {}/{})",
            report.attempted,
            report.completed,
            report.skipped,
            sim.total_runs(),
            MAX_TOTAL_RUNS
        );
    }

    if !sim.tracker().is_empty() {
        println!();
        print_distribution(&sim);
    }

    if let Some(path) = cfg.output {
        let dof = sim.dof();
        let report = ChiReport {
            table: sim.table().with_totals(),
            sample_size: sim.sample_size().get(),
            dof,
            total_runs: sim.total_runs(),
            batch: BatchReport {
                attempted: sim.total_runs(),
                completed: sim.tracker().len() as u64,
                skipped: sim.total_runs() - sim.tracker().len() as u64,
            },
            mean: sim.tracker().mean(),
            histogram: sim.tracker().histogram(),
            overlay: sim.tracker().overlay(|x| chi2_pdf(x, dof)),
            values: sim.tracker().values(),
        };
        match serde_json::to_string_pretty(&report) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    eprintln!("Error writing report: {e}");
                    std::process::exit(1);
                }
                println!("Wrote report to {path}");
            }
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Print the normalized table with its marginal sums.
fn print_table(table: &ContingencyTable, sample_size: SampleSize) {
    let totaled = table.with_totals();
    println!("Contingency table (sample size {sample_size})");
    println!();

    let label_width = totaled
        .row_labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0);

    print!("  {:label_width$}", "");
    for col in &totaled.col_labels {
        print!("  {col:>12}");
    }
    println!();

    for (label, row) in totaled.row_labels.iter().zip(&totaled.cells) {
        print!("  {label:<label_width$}");
        for v in row {
            print!("  {v:>12}");
        }
        println!();
    }
    println!();
}

/// Print the accumulated distribution: summary, histogram, overlay.
fn print_distribution(sim: &ChiSimulation) {
    let tracker = sim.tracker();
    let dof = sim.dof();

    println!("Chi-square distribution, {dof} dof");
    println!("  runs: {}", tracker.len());
    println!("  mean: {:.4}", tracker.mean());
    println!("  max:  {:.4}", tracker.max().unwrap_or(0.0));
    println!();

    let hist = tracker.histogram();
    if hist.bin_width <= 0.0 {
        return;
    }
    let peak = hist.counts.iter().copied().max().unwrap_or(1).max(1);

    println!("Histogram ({} bins, theoretical in parentheses)", hist.counts.len());
    for (i, &count) in hist.counts.iter().enumerate() {
        let (lo, hi) = hist.bin_edges(i);
        let mid = (lo + hi) / 2.0;
        let expected = chi2_pdf(mid, dof) * tracker.len() as f64 * hist.bin_width;
        let bar_len = (count as usize * BAR_WIDTH).div_ceil(peak as usize);
        println!(
            "  [{lo:8.3}, {hi:8.3})  {:<40}  {count:5}  ({expected:.1})",
            "#".repeat(bar_len)
        );
    }
}
