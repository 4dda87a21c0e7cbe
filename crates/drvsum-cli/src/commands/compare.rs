use std::time::Instant;

use drvsum_core::{Aggregation, Distribution, Method, SumError, SumOptions, Weighted, compare};

/// One strategy's result and its wall time in milliseconds.
pub type StrategyRun = (Method, Result<Distribution, SumError>, f64);

/// Run every strategy over the same inputs. Pairwise snaps its sums onto the
/// inputs' lattice so it lines up with the grid strategies.
pub fn run_strategies(inputs: &[Weighted], delta: f64, tolerance: f64) -> Vec<StrategyRun> {
    let options = SumOptions {
        delta,
        aggregation: Aggregation::Grid { delta },
        tolerance,
        ..SumOptions::default()
    };
    Method::ALL
        .iter()
        .map(|&method| {
            let t0 = Instant::now();
            let result = drvsum_core::sum(method, inputs.to_vec(), &options);
            (method, result, t0.elapsed().as_secs_f64() * 1000.0)
        })
        .collect()
}

/// Number of runs that failed or disagree with `reference`.
pub fn count_disagreements(runs: &[StrategyRun], reference: &Distribution, tolerance: f64) -> usize {
    runs.iter()
        .filter(|(_, result, _)| match result {
            Ok(result) => !compare(reference, result, tolerance).agrees(tolerance.max(1e-9)),
            Err(_) => true,
        })
        .count()
}

pub fn run(input: &str, delta: f64, tolerance: f64) {
    let inputs = super::read_inputs(input);

    println!(
        "Comparing strategies on {} distribution(s) (delta={delta})\n",
        inputs.len()
    );

    let runs = run_strategies(&inputs, delta, tolerance);

    // The first strategy that succeeds (pairwise, normally) is the reference.
    let Some(reference) = runs.iter().find_map(|(_, r, _)| r.as_ref().ok()) else {
        eprintln!("Every strategy failed:");
        for (method, result, _) in &runs {
            if let Err(e) = result {
                eprintln!("  {method}: {e}");
            }
        }
        std::process::exit(1);
    };

    println!(
        "  {:<12} {:>9} {:>10} {:>12} {:>12}  Support",
        "Method", "Outcomes", "Time", "Max |Δp|", "|Δ mass|"
    );
    println!("  {}", "-".repeat(70));

    for (method, result, ms) in &runs {
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                println!("  {:<12} failed: {e}", method.to_string());
                continue;
            }
        };
        let gap = compare(reference, result, tolerance);
        println!(
            "  {:<12} {:>9} {:>8.3}ms {:>12.3e} {:>12.3e}  {}",
            method.to_string(),
            result.len(),
            ms,
            gap.max_abs_difference,
            gap.mass_difference,
            if gap.same_support { "same" } else { "differs" }
        );
    }

    println!();
    let disagreements = count_disagreements(&runs, reference, tolerance);
    if disagreements == 0 {
        println!("All strategies agree.");
    } else {
        println!("{disagreements} strategy result(s) disagree with the reference.");
        std::process::exit(1);
    }
}
