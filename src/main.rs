//! Seamguard local match runner.
//!
//! Plays one match on the reference engine and prints each move followed by
//! the final score.
//!
//! Usage:
//!   seamguard --layout FILE [OPTIONS]
//!
//! Options:
//!   --layout FILE   Layout file to play on (required)
//!   --config FILE   JSON match configuration (default: symmetric everywhere)
//!   --turns N       Maximum single-agent turns (default: 1200)
//!   --seed N        Base seed for agents without a configured seed
//!
//! Set `RUST_LOG=debug` to see per-action scores on stderr.

use std::env;
use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;

use tracing_subscriber::filter::EnvFilter;

use seamguard::board::layout::load_layout;
use seamguard::board::territory::Side;
use seamguard::config::MatchConfig;
use seamguard::game::{play_match, MatchSettings};

fn print_usage() {
    eprintln!("Usage: seamguard --layout FILE [--config FILE] [--turns N] [--seed N]");
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> Result<T, String> {
    let raw = value.ok_or_else(|| format!("missing value for {}", flag))?;
    raw.parse()
        .map_err(|_| format!("invalid {} value: {}", flag, raw))
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().collect();
    let mut settings = MatchSettings::default();
    let mut layout_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--layout" => {
                i += 1;
                layout_path = Some(parse_value("--layout", args.get(i))?);
            }
            "--config" => {
                i += 1;
                config_path = Some(parse_value("--config", args.get(i))?);
            }
            "--turns" => {
                i += 1;
                settings.turns = parse_value("--turns", args.get(i))?;
            }
            "--seed" => {
                i += 1;
                settings.seed = Some(parse_value("--seed", args.get(i))?);
            }
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            other => {
                print_usage();
                return Err(format!("unknown argument: {}", other).into());
            }
        }
        i += 1;
    }

    let Some(layout_path) = layout_path else {
        print_usage();
        return Err("--layout is required".into());
    };

    let layout = load_layout(&layout_path)?;
    if let Some(path) = config_path {
        settings.config = MatchConfig::load(&path)?;
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_err: Option<io::Error> = None;
    let result = play_match(&layout, &settings, |t| {
        if write_err.is_none() {
            if let Err(e) = writeln!(out, "turn {} agent {} {}", t.turn, t.agent, t.action) {
                write_err = Some(e);
            }
        }
    })?;
    if let Some(e) = write_err {
        return Err(e.into());
    }
    writeln!(
        out,
        "score {} {}",
        result.score(Side::Left),
        result.score(Side::Right)
    )?;
    out.flush()?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
