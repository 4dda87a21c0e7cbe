use drvsum_core::{Distribution, SumOptions, Weighted};

pub fn run(count: u32, sides: u32, method: &str, output_path: Option<&str>) {
    if count == 0 || sides == 0 {
        eprintln!("Need at least one die with at least one side.");
        std::process::exit(1);
    }
    let method = super::parse_method(method);
    let die = Distribution::uniform((1..=sides).map(f64::from));
    println!("Sum of {count}d{sides} with {method}\n");

    let result = match drvsum_core::sum(
        method,
        [Weighted::new(die, i64::from(count))],
        &SumOptions::default(),
    ) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Sum failed: {e}");
            std::process::exit(1);
        }
    };

    super::print_distribution(&result);

    if let Some(path) = output_path {
        super::write_json(path, &result);
    }
}
