//! pstgrep - grep for the live process tree.
//!
//! This is the binary entry point: it parses arguments, initializes logging,
//! and drives the scan → assemble → annotate → render pipeline once.

use anyhow::Context;
use clap::Parser;
use pstgrep::cli::{Args, LogLevel};
use pstgrep::config::Config;
use pstgrep::matcher::{MatchAnnotation, Matcher};
use pstgrep::process::Scanner;
use pstgrep::{render, tree};
use std::io::{self, Write};
use tracing::{debug, Level};

/// Initializes tracing logging with the configured log level. Log output
/// goes to stderr so the rendered tree on stdout stays clean.
fn setup_logging(args: &Args) {
    let log_level = match args.log_level {
        LogLevel::Off => Level::ERROR,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    // --enable-trace needs the per-node decision events regardless of the
    // chosen level.
    let log_level = if args.enable_trace {
        Level::TRACE
    } else {
        log_level
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Runs the whole pipeline: one snapshot in, matched branches out.
fn run(cfg: &Config) -> anyhow::Result<()> {
    let records = Scanner::from_config(cfg)
        .scan()
        .context("collecting process snapshot")?;

    let forest = tree::assemble(records);

    let matcher = Matcher::from_config(cfg);
    let annotation = MatchAnnotation::build(&forest, &matcher);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    render::render_forest(&mut out, &forest, &annotation, cfg).context("writing output")?;
    out.flush().context("writing output")?;

    debug!(
        cache_hits = annotation.cache_hits(),
        nodes = annotation.len(),
        "match cache statistics"
    );

    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let cfg = Config::from_args(&args);

    if let Err(err) = run(&cfg) {
        eprintln!("pstgrep: {err:#}");
        std::process::exit(1);
    }
}
