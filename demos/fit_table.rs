//! Fit a model to a four column data table and print the report.
//!
//! ```text
//! cargo run --example fit_table -- <table> <model> <a0> [a1 ...] [--range XMIN XMAX]
//! ```
//!
//! With no arguments a built-in exponential decay table is fitted.

use std::env;
use std::process;

use ndarray::Array1;
use xyfit_rs::data::parse_table;
use xyfit_rs::{CurveFit, DataSet, ModelFunction, Result};

const SAMPLE: &str = "\
# x    dx    y      dy
0.0   0.05  10.12  0.3
0.5   0.05   7.71  0.3
1.0   0.05   6.02  0.3
1.5   0.05   4.79  0.3
2.0   0.05   3.61  0.3
2.5   0.05   2.93  0.3
3.0   0.05   2.18  0.3
3.5   0.05   1.77  0.3
4.0   0.05   1.31  0.3
";

struct Options {
    data: DataSet,
    model: ModelFunction,
    initial: Array1<f64>,
    range: Option<(f64, f64)>,
}

fn parse_number(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| xyfit_rs::FitError::InvalidInput(format!("'{}' is not a number", text)))
}

fn parse_args(args: &[String]) -> Result<Options> {
    if args.is_empty() {
        return Ok(Options {
            data: parse_table(SAMPLE)?,
            model: ModelFunction::Exponential,
            initial: ndarray::array![9.0, -0.4],
            range: None,
        });
    }
    if args.len() < 3 {
        return Err("usage: fit_table <table> <model> <a0> [a1 ...] [--range XMIN XMAX]".into());
    }

    let data = DataSet::from_path(&args[0])?;
    let model: ModelFunction = args[1].parse()?;

    let mut initial = Vec::new();
    let mut range = None;
    let mut rest = args[2..].iter();
    while let Some(arg) = rest.next() {
        if arg == "--range" {
            let (Some(lo), Some(hi)) = (rest.next(), rest.next()) else {
                return Err("--range needs two values".into());
            };
            range = Some((parse_number(lo)?, parse_number(hi)?));
        } else {
            initial.push(parse_number(arg)?);
        }
    }

    Ok(Options {
        data,
        model,
        initial: Array1::from_vec(initial),
        range,
    })
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = parse_args(&args)?;

    let data = match options.range {
        Some((lo, hi)) => options.data.select_range(lo, hi)?,
        None => options.data,
    };

    let grid = data.display_grid(5000);
    let result = CurveFit::new().fit(options.model, &data, &options.initial, &grid)?;

    println!("{}", result);
    println!();
    println!("Residuals:");
    for (x, r) in data.x().iter().zip(result.residuals(&data).iter()) {
        println!("  x = {:>10.4}  y - f(x) = {:>10.4}", x, r);
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
