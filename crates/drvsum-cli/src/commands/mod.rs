pub mod compare;
pub mod dice;
pub mod sum;

use drvsum_core::{Aggregation, Distribution, Method, Weighted};
use serde::Serialize;

/// Widest bar drawn next to a probability in the output table.
const BAR_WIDTH: usize = 40;

/// Parse a method name into the enum.
pub fn parse_method(s: &str) -> Method {
    match s.parse() {
        Ok(method) => method,
        Err(e) => {
            eprintln!("{e}, using hybrid");
            Method::Hybrid
        }
    }
}

/// Parse an aggregation name, filling in its parameter.
pub fn parse_aggregation(s: &str, tolerance: f64, delta: f64) -> Aggregation {
    match s {
        "exact" => Aggregation::Exact,
        "tolerance" | "tol" => Aggregation::Tolerance(tolerance),
        "grid" => Aggregation::Grid { delta },
        _ => {
            eprintln!("Unknown aggregation '{s}', using exact");
            Aggregation::Exact
        }
    }
}

/// Read a JSON array of weighted distributions.
pub fn load_inputs(path: &str) -> Result<Vec<Weighted>, String> {
    let contents =
        std::fs::read_to_string(path).map_err(|e| format!("Failed to read {path}: {e}"))?;
    let inputs: Vec<Weighted> =
        serde_json::from_str(&contents).map_err(|e| format!("Failed to parse {path}: {e}"))?;
    if inputs.is_empty() {
        return Err(format!("{path} lists no distributions"));
    }
    Ok(inputs)
}

/// [`load_inputs`], exiting the process on failure.
pub fn read_inputs(path: &str) -> Vec<Weighted> {
    match load_inputs(path) {
        Ok(inputs) => {
            log::info!("loaded {} weighted distribution(s) from {path}", inputs.len());
            inputs
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

/// Print a sum distribution as a table with a bar per row, then its moments.
pub fn print_distribution(dist: &Distribution) {
    let peak = dist.probabilities().iter().copied().fold(0.0, f64::max);
    println!("  {:>12} {:>14}", "Value", "Probability");
    println!("  {}", "-".repeat(29 + BAR_WIDTH));
    for (value, p) in dist.pairs() {
        let bar = if peak > 0.0 {
            ((p.max(0.0) / peak) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        println!("  {value:>12.6} {p:>14.6e} {}", "█".repeat(bar));
    }
    println!();
    println!("  Outcomes:   {}", dist.len());
    println!("  Total mass: {:.12}", dist.total_probability());
    println!("  Mean:       {:.6}", dist.mean());
    println!("  Variance:   {:.6}", dist.variance());
}

/// Write a value as pretty JSON, reporting the outcome.
pub fn write_json<T: Serialize>(path: &str, value: &T) {
    let json = match serde_json::to_string_pretty(value) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to serialize output: {e}");
            return;
        }
    };
    match std::fs::write(path, json) {
        Ok(()) => println!("\nResults written to {path}"),
        Err(e) => eprintln!("\nFailed to write {path}: {e}"),
    }
}
