use std::time::Instant;

use drvsum_core::SumOptions;

pub struct SumCommandConfig<'a> {
    pub input: &'a str,
    pub method: &'a str,
    pub delta: f64,
    pub aggregation: &'a str,
    pub tolerance: f64,
    pub validate: bool,
    pub output_path: Option<&'a str>,
}

pub fn run(config: SumCommandConfig<'_>) {
    let method = super::parse_method(config.method);
    let inputs = super::read_inputs(config.input);
    let options = SumOptions {
        delta: config.delta,
        aggregation: super::parse_aggregation(config.aggregation, config.tolerance, config.delta),
        validate: config.validate,
        tolerance: config.tolerance,
    };

    let copies: i64 = inputs.iter().map(|w| w.repetitions.max(0)).sum();
    println!(
        "Summing {} distribution(s), {copies} variable(s) in total, with {method} (delta={})\n",
        inputs.len(),
        config.delta
    );

    let t0 = Instant::now();
    let result = match drvsum_core::sum(method, inputs, &options) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Sum failed: {e}");
            std::process::exit(1);
        }
    };
    let elapsed = t0.elapsed();

    super::print_distribution(&result);
    println!("  Time:       {:.3}ms", elapsed.as_secs_f64() * 1000.0);

    if let Some(path) = config.output_path {
        super::write_json(path, &result);
    }
}
