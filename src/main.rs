//! Streams Dashboard CLI
//!
//! Replays a token-stream event journal and outputs the account's
//! per-token dashboard state as CSV.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.csv --period hour --tokens tokens.csv > dashboard.csv
//! ```
//!
//! Unrecognized `--period` labels fall back to per-second figures.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use streams_dashboard::{DashboardEngine, DisplayPeriod, EngineError, Result, TokenRegistry};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let options = Options::parse(&args[1..])?;

    let file = File::open(&options.journal_path)?;
    let reader = BufReader::new(file);

    let mut engine = DashboardEngine::new();
    engine.process_csv(reader)?;

    let registry = match &options.tokens_path {
        Some(path) => TokenRegistry::from_csv(BufReader::new(File::open(path)?))?,
        None => TokenRegistry::new(),
    };

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle, options.period, &registry)?;

    Ok(())
}

/// Parsed command-line options.
struct Options {
    journal_path: String,
    period: DisplayPeriod,
    tokens_path: Option<String>,
}

impl Options {
    fn parse(args: &[String]) -> Result<Options> {
        let mut journal_path = None;
        let mut period = DisplayPeriod::Unscaled;
        let mut tokens_path = None;

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--period" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| EngineError::MissingFlagValue("--period".to_string()))?;
                    period = DisplayPeriod::parse(value);
                }
                "--tokens" => {
                    let value = iter
                        .next()
                        .ok_or_else(|| EngineError::MissingFlagValue("--tokens".to_string()))?;
                    tokens_path = Some(value.clone());
                }
                other if other.starts_with("--") => {
                    return Err(EngineError::UnexpectedArgument(other.to_string()));
                }
                other if journal_path.is_none() => {
                    journal_path = Some(other.to_string());
                }
                other => {
                    return Err(EngineError::UnexpectedArgument(other.to_string()));
                }
            }
        }

        Ok(Options {
            journal_path: journal_path.ok_or(EngineError::MissingArgument)?,
            period,
            tokens_path,
        })
    }
}
