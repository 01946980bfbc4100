//! Code to configure and run the parser and rewriting engine on an input
//! expression.

use std::fs;

use clap::Parser;
use thiserror::Error;
use tracing::info;

use crate::church_numerals::{decode, ChurchError, ChurchEncoder};
use crate::recursive_descent_parsing::parse;
use crate::term_rewriting::{normalize, ReductionError};

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// The expression to run.
    #[arg(short, long, conflicts_with = "src_filepath")]
    pub expression: Option<String>,

    /// A file holding the expression to run.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Reject binders without an explicit bound variable.
    #[arg(long, default_value_t = false)]
    pub disallow_anonymous: bool,

    /// Replace numeral literals with Church numerals before reducing.
    #[arg(short, long, default_value_t = false)]
    pub church: bool,

    /// Beta-reduce the expression to normal form.
    #[arg(short, long, default_value_t = false)]
    pub reduce: bool,

    /// Upper bound on beta-reduction passes.
    #[arg(short, long, default_value_t = 1000)]
    pub max_steps: usize,

    /// Raise the log level (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Interpreter configuration error: {0}")]
    ConfigError(String),

    #[error("Input file error: {0}")]
    InputFileError(#[from] std::io::Error),

    #[error("Could not parse the expression.")]
    ParseFailed,

    #[error("Church numeral conversion error: {0}")]
    ChurchError(#[from] ChurchError),

    #[error("Reduction error: {0}")]
    ReductionError(#[from] ReductionError),
}

// Reads the expression text from whichever source the config names.
fn read_source(config: &InterpreterConfig) -> Result<String, RunError> {
    match (&config.expression, &config.src_filepath) {
        (Some(expression), None) => return Ok(expression.clone()),
        (None, Some(src_filepath)) => return Ok(fs::read_to_string(src_filepath)?),
        _ => {
            return Err(RunError::ConfigError(String::from(
                "Exactly one of --expression and --src-filepath must be given.",
            )));
        }
    }
}

/// Run the parser (and, if configured, numeral conversion and reduction)
/// given an interpreter config. Returns the reconstructed result, followed by
/// ` = n` when it is a Church numeral.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    let program_string = read_source(config)?;

    let mut term =
        parse(program_string.as_str(), !config.disallow_anonymous).ok_or(RunError::ParseFailed)?;
    info!(%term, "parsed expression");

    if config.church {
        term = ChurchEncoder::new().convert(&term)?;
        info!(%term, "converted numerals");
    }

    if config.reduce {
        term = normalize(&term, config.max_steps)?;
    }

    match decode(&term) {
        Some(number) if config.reduce => return Ok(format!("{} = {}", term, number)),
        _ => return Ok(term.reconstruct()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(args: &[&str]) -> InterpreterConfig {
        let mut argv = vec!["lambda-rewrite"];
        argv.extend_from_slice(args);
        return InterpreterConfig::try_parse_from(argv).expect("Unable to parse test arguments.");
    }

    // Test if a parsed expression is printed back in surface syntax.
    #[test]
    fn test_parse_only() {
        let config = config_for(&["--expression", "a b c"]);

        assert_eq!(
            run_interpreter(&config).expect("run_interpreter returned unexpected error"),
            "((a) b) c"
        );
    }

    // Test if reduction with Church numerals reports the decoded number.
    #[test]
    fn test_reduce_church_addition() {
        let config = config_for(&[
            "--expression",
            "(λm.λn.λf.λx.m f (n f x)) 1 2",
            "--church",
            "--reduce",
        ]);

        assert_eq!(
            run_interpreter(&config).expect("run_interpreter returned unexpected error"),
            "λf.λx.(f) ((f) ((f) x)) = 3"
        );
    }

    // Test if parse failures and disallowed binders surface as ParseFailed.
    #[test]
    fn test_parse_failed() {
        let config = config_for(&["--expression", "\\ x", "--disallow-anonymous"]);

        assert!(matches!(run_interpreter(&config), Err(RunError::ParseFailed)));

        let config = config_for(&["--expression", "(x"]);

        assert!(matches!(run_interpreter(&config), Err(RunError::ParseFailed)));
    }

    // Test if the step limit is reported as a reduction error.
    #[test]
    fn test_step_limit() {
        let config = config_for(&[
            "--expression",
            "(\\x. x x x) (\\x. x x x)",
            "--reduce",
            "--max-steps",
            "3",
        ]);

        assert!(matches!(
            run_interpreter(&config),
            Err(RunError::ReductionError(ReductionError::StepLimitExceeded { steps: 3 }))
        ));
    }

    // Test if a missing source is a configuration error.
    #[test]
    fn test_missing_source() {
        let config = config_for(&["--reduce"]);

        assert!(matches!(run_interpreter(&config), Err(RunError::ConfigError(_))));
    }

    // Test if an unreadable file is reported as an input file error.
    #[test]
    fn test_missing_file() {
        let config = config_for(&["--src-filepath", "/nonexistent/expression.lc"]);

        assert!(matches!(run_interpreter(&config), Err(RunError::InputFileError(_))));
    }
}
