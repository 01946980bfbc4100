//! Parse a lambda calculus expression, optionally reduce it, and print the
//! result to standard output.
//!
//! Example usage:
//!
//!     cargo run -- \
//!         --expression '(λm.λn.λf.λx.m f (n f x)) 2 3' \
//!         --church --reduce

use clap::Parser;
use lambda_rewrite::end_to_end::{run_interpreter, InterpreterConfig};
use tracing::Level;

fn main() {
    let interpreter_config = InterpreterConfig::parse();

    let max_level = match interpreter_config.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(execution_result) => {
            println!("{}", execution_result);
        }

        Err(run_error) => {
            println!("{}", run_error);
            std::process::exit(1);
        }
    }
}
