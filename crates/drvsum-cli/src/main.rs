//! CLI for drvsum: sum independent discrete random variables from the shell.

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "drvsum")]
#[command(about = "drvsum: PMF of a sum of independent discrete random variables")]
#[command(version = drvsum_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sum the distributions listed in a JSON file.
    /// Input: [{"pmf": [[value, probability], ...], "repetitions": 1}, ...]
    Sum {
        /// Path to the JSON input file
        #[arg(long)]
        input: String,

        /// Summation strategy
        #[arg(long, default_value = "hybrid", value_parser = ["pairwise", "convolution", "spectral", "hybrid"])]
        method: String,

        /// Grid spacing shared by all inputs (grid strategies only)
        #[arg(long, default_value = "1.0")]
        delta: f64,

        /// How the pairwise strategy groups equal sums
        #[arg(long, default_value = "exact", value_parser = ["exact", "tolerance", "grid"])]
        aggregation: String,

        /// Absolute tolerance for validation and tolerance aggregation
        #[arg(long, default_value = "1e-9")]
        tolerance: f64,

        /// Reject unsorted, off-grid or unnormalized input before summing
        #[arg(long)]
        validate: bool,

        /// Write the resulting distribution as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Sum of N fair dice with S sides each
    Dice {
        /// Number of dice
        #[arg(long, default_value = "2")]
        count: u32,

        /// Sides per die (faces 1..=S)
        #[arg(long, default_value = "6")]
        sides: u32,

        /// Summation strategy
        #[arg(long, default_value = "hybrid", value_parser = ["pairwise", "convolution", "spectral", "hybrid"])]
        method: String,

        /// Write the resulting distribution as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Run all four strategies on one input and report how far they disagree
    Compare {
        /// Path to the JSON input file
        #[arg(long)]
        input: String,

        /// Grid spacing shared by all inputs
        #[arg(long, default_value = "1.0")]
        delta: f64,

        /// Values closer than this are treated as the same outcome
        #[arg(long, default_value = "1e-9")]
        tolerance: f64,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sum {
            input,
            method,
            delta,
            aggregation,
            tolerance,
            validate,
            output,
        } => commands::sum::run(commands::sum::SumCommandConfig {
            input: &input,
            method: &method,
            delta,
            aggregation: &aggregation,
            tolerance,
            validate,
            output_path: output.as_deref(),
        }),
        Commands::Dice {
            count,
            sides,
            method,
            output,
        } => commands::dice::run(count, sides, &method, output.as_deref()),
        Commands::Compare {
            input,
            delta,
            tolerance,
        } => commands::compare::run(&input, delta, tolerance),
    }
}
