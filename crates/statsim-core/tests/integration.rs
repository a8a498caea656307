//! Integration tests for statsim-core.
//!
//! These tests verify the full simulation pipeline:
//! form validation → resampling session → accumulation → save-file round trip,
//! plus the CSV-driven t-test flow.

use rand::SeedableRng;
use rand::rngs::StdRng;

use statsim_core::{
    ChiSimulation, ContingencyTable, HISTOGRAM_BINS, SampleSize, TableForm, export_table,
    import_table, read_sample_csv, validate_form,
};

fn men_women_form() -> TableForm {
    TableForm {
        grid: vec![
            vec!["".into(), "Democrats".into(), "Republicans".into()],
            vec!["Men".into(), "10".into(), "10".into()],
            vec!["Women".into(), "10".into(), "10".into()],
        ],
        sample_size: "20".into(),
    }
}

#[test]
fn form_to_simulation_to_histogram() {
    let (table, sample_size) = validate_form(&men_women_form()).unwrap();
    assert_eq!(table.grand_total(), 40);
    assert_eq!(sample_size.get(), 20);

    // The normalized table's margins equal the input sums.
    let totaled = table.with_totals();
    assert_eq!(totaled.cells[2], vec![20, 20, 40]);
    assert_eq!(totaled.cells[0][2], 20);

    let mut sim = ChiSimulation::new(table, sample_size);
    let mut rng = StdRng::seed_from_u64(99);

    // A single draw always sums to the sample size.
    let run = sim.run_once(&mut rng).unwrap();
    assert_eq!(run.counts.iter().flatten().sum::<u64>(), 20);

    let report = sim.run_batch(1000, &mut rng).unwrap();
    assert_eq!(report.attempted, 1000);
    assert_eq!(sim.total_runs(), 1001);

    let hist = sim.tracker().histogram();
    assert_eq!(hist.counts.len(), HISTOGRAM_BINS);
    assert_eq!(hist.total(), sim.tracker().len() as u64);

    let overlay = sim
        .tracker()
        .overlay(|x| statsim_stats::chi2_pdf(x, sim.dof()));
    assert_eq!(overlay.len(), 50);
    assert!(overlay.iter().all(|p| p.y.is_finite() && p.y >= 0.0));
}

#[test]
fn save_file_round_trip_preserves_everything() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("save.stat");

    let mut rng = StdRng::seed_from_u64(4);
    let table = ContingencyTable::random_3x3(&mut rng);
    let sample_size = SampleSize::new(100, table.grand_total()).unwrap();

    export_table(&path, &table, sample_size).unwrap();
    let (imported, imported_sample) = import_table(&path).unwrap();

    assert_eq!(imported, table);
    assert_eq!(imported_sample, sample_size);

    // The imported table drives a session just like a validated one.
    let mut sim = ChiSimulation::new(imported, imported_sample);
    let report = sim.run_batch(100, &mut rng).unwrap();
    assert_eq!(report.attempted, 100);
}

#[test]
fn csv_to_t_test() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("samples.csv");
    std::fs::write(
        &path,
        "Control,Treatment\n48.2,53.9\n51.0,55.2\n49.7,54.1\n50.3,56.0\n47.9,52.8\n",
    )
    .unwrap();

    let pair = read_sample_csv(&path).unwrap();
    assert_eq!(pair.a.len(), 5);
    assert_eq!(pair.b.len(), 5);

    let summary = pair.summary();
    assert!(summary.mean_b > summary.mean_a);

    let report = pair.test().unwrap();
    assert_eq!(report.dof, 8);
    assert!(report.significant, "p = {}", report.p_value);
}
