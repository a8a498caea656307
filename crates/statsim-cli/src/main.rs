//! CLI for statsim — simulated sampling distributions for classroom statistics.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "statsim")]
#[command(about = "statsim — simulated sampling distributions for classroom statistics")]
#[command(version = statsim_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chi-square independence simulation over a contingency table
    Chi {
        /// Generate a random table: 2 (2x2) or 3 (3x3)
        #[arg(long, value_parser = ["2", "3"])]
        random: Option<String>,

        /// Load a saved table; without a path, reads the desktop save file
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        load: Option<String>,

        /// Number of resample draws
        #[arg(long, default_value = "1000")]
        runs: u64,

        /// Seed the random number generator for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Write the table as a save file; without a path, writes the desktop save file
        #[arg(long, num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,

        /// Write the full run report as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Two-sample t-test over imported or randomly generated data
    T {
        /// CSV file with exactly 2 numeric columns (header row dropped)
        #[arg(long)]
        csv: Option<String>,

        /// Seed the random number generator for reproducible data
        #[arg(long)]
        seed: Option<u64>,

        /// Write the test report as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Chi {
            random,
            load,
            runs,
            seed,
            export,
            output,
        } => commands::chi::run(commands::chi::ChiCommandConfig {
            random: random.as_deref(),
            load: load.as_deref(),
            runs,
            seed,
            export: export.as_deref(),
            output: output.as_deref(),
        }),
        Commands::T { csv, seed, output } => {
            commands::t::run(csv.as_deref(), seed, output.as_deref())
        }
    }
}
