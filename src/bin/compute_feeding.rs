//! Utility to compute a daily feeding amount from a chart file
//!
//! Usage: compute_feeding <feed.json> <weight_kg> <age_days> [rounding_step]

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::process::ExitCode;

use pupfeed::config::Settings;
use pupfeed::feeding::{self, FeedResult, Query};
use pupfeed::models::{FeedingResult, RawFeed};
use pupfeed::tools::feeds::read_feed_file;

/// Parsed command line
#[derive(Debug, PartialEq)]
struct Invocation {
    path: PathBuf,
    weight_kg: f64,
    age_days: f64,
    /// Falls back to the configured step when omitted
    rounding_step: Option<NonZeroU32>,
}

fn usage(args: &[String]) -> String {
    let program = args.first().map_or("compute_feeding", String::as_str);
    format!(
        "Usage: {} <feed.json> <weight_kg> <age_days> [rounding_step]",
        program
    )
}

fn parse_arg<T: std::str::FromStr>(value: &str, name: &str) -> Result<T, String> {
    value
        .trim()
        .parse()
        .map_err(|_| format!("Invalid {}: '{}'", name, value))
}

/// `Ok(None)` when the argument count is wrong
fn parse_invocation(args: &[String]) -> Result<Option<Invocation>, String> {
    if args.len() < 4 || args.len() > 5 {
        return Ok(None);
    }
    let rounding_step = match args.get(4) {
        Some(step) => Some(parse_arg::<NonZeroU32>(step, "rounding step")?),
        None => None,
    };
    Ok(Some(Invocation {
        path: PathBuf::from(&args[1]),
        weight_kg: parse_arg(&args[2], "weight")?,
        age_days: parse_arg(&args[3], "age")?,
        rounding_step,
    }))
}

fn compute_from_text(text: &str, query: &Query) -> FeedResult<FeedingResult> {
    let raw = RawFeed::from_json_str(text)?;
    let feed = feeding::normalize(&raw)?;
    feeding::compute(&feed, query)
}

fn run(args: &[String]) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(invocation) = parse_invocation(args)? else {
        eprintln!("{}", usage(args));
        return Ok(ExitCode::from(2));
    };

    let settings = Settings::from_env()?;
    let rounding_step = invocation.rounding_step.unwrap_or(settings.rounding_step);
    let query =
        Query::new(invocation.weight_kg, invocation.age_days).with_rounding_step(rounding_step);
    let text = read_feed_file(&invocation.path)?;

    match compute_from_text(&text, &query) {
        Ok(result) => {
            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.diagnosis())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
