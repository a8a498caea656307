//! `statsim t` — two-sample t-test over imported or generated data.

use std::path::Path;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use statsim_core::{PairSummary, SamplePair, TTestReport, read_sample_csv};
use statsim_stats::{norm_pdf, t_pdf, t_ppf};

/// Points per plotted density curve.
const CURVE_POINTS: usize = 100;

/// One point of a density curve.
#[derive(Serialize)]
struct CurvePoint {
    x: f64,
    y: f64,
}

/// Machine-readable test report (`--output`).
#[derive(Serialize)]
struct TReport<'a> {
    summary: PairSummary,
    test: TTestReport,
    /// Two-tailed 5% critical value.
    critical: f64,
    a: &'a [f64],
    b: &'a [f64],
    /// Normal densities fitted to each sample, mean ± 3 sigma.
    density_a: Vec<CurvePoint>,
    density_b: Vec<CurvePoint>,
    /// Theoretical t density between its 0.1% and 99.9% quantiles.
    t_curve: Vec<CurvePoint>,
}

/// Run the t command.
pub fn run(csv: Option<&str>, seed: Option<u64>, output: Option<&str>) {
    let pair = match csv {
        Some(path) => match read_sample_csv(Path::new(path)) {
            Ok(pair) => pair,
            Err(e) => {
                eprintln!("Error reading {path}: {e}");
                std::process::exit(1);
            }
        },
        None => match seed {
            Some(seed) => random_pair(StdRng::seed_from_u64(seed)),
            None => random_pair(rand::rng()),
        },
    };

    let summary = pair.summary();
    print_summary(&summary);

    let report = match pair.test() {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let critical = t_ppf(0.975, report.dof);
    println!(
        "T value: {:.2}, P value: {:.4}, {}",
        report.statistic,
        report.p_value,
        report.verdict()
    );
    println!("Two-tailed 5% critical value: ±{critical:.3}");

    if let Some(path) = output {
        let doc = TReport {
            summary,
            test: report,
            critical,
            a: &pair.a,
            b: &pair.b,
            density_a: normal_curve(summary.mean_a, summary.variance_a),
            density_b: normal_curve(summary.mean_b, summary.variance_b),
            t_curve: t_density_curve(report.dof),
        };
        match serde_json::to_string_pretty(&doc) {
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

fn random_pair(mut rng: impl Rng) -> SamplePair {
    SamplePair::random(&mut rng)
}

/// Print the summary table of the original t-test page.
fn print_summary(summary: &PairSummary) {
    println!("            {:>10}  {:>10}", "Data A", "Data B");
    println!(
        "  Mean      {:>10.2}  {:>10.2}",
        summary.mean_a, summary.mean_b
    );
    println!(
        "  Variance  {:>10.2}  {:>10.2}",
        summary.variance_a, summary.variance_b
    );
    println!(
        "  Elements  {:>10}  {:>10}",
        summary.len_a, summary.len_b
    );
    println!();
}

/// Normal density fitted to a sample, plotted over mean ± 3 sigma.
fn normal_curve(mean: f64, variance: f64) -> Vec<CurvePoint> {
    let sigma = variance.sqrt();
    if sigma <= 0.0 {
        return Vec::new();
    }
    let lo = mean - 3.0 * sigma;
    let step = 6.0 * sigma / (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            CurvePoint {
                x,
                y: norm_pdf(x, mean, sigma),
            }
        })
        .collect()
}

/// Theoretical t density between its extreme quantiles.
fn t_density_curve(dof: usize) -> Vec<CurvePoint> {
    let lo = t_ppf(0.001, dof);
    let hi = t_ppf(0.999, dof);
    let step = (hi - lo) / (CURVE_POINTS - 1) as f64;
    (0..CURVE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            CurvePoint {
                x,
                y: t_pdf(x, dof),
            }
        })
        .collect()
}
