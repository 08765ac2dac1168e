//! scanbench: time substring search strategies over one file.
//!
//! Runs each registered strategy against the same memory-mapped input and
//! prints one line per strategy. Logs go to stderr so stdout carries only the
//! report.

mod config;
mod input;

use anyhow::Context;
use config::{BenchConfig, Command};
use input::InputFile;
use scancore::{Consistency, Harness, Pattern, Report};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// JSON shape of a run: the report plus its consistency verdict.
#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    report: &'a Report,
    consistency: Consistency,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match BenchConfig::parse(std::env::args_os().skip(1)) {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            println!("{}", config::USAGE);
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {}\n\n{}", e, config::USAGE);
            std::process::exit(2);
        }
    };

    run(&config)
}

fn run(config: &BenchConfig) -> anyhow::Result<()> {
    let registry = config.registry()?;
    let pattern = Pattern::new(config.pattern.clone())?;
    let input = InputFile::open(config.input.clone()).with_context(|| {
        format!("Failed to load input \"{}\"", config.input.to_string_lossy())
    })?;

    debug!("Mapped {} ({:?})", input.path().display(), input);
    if !config.json {
        println!("Scanning {} bytes", input.len());
    }
    info!(
        "Scanning {} bytes of {} for {} with {} strategies",
        input.len(),
        input.location().to_string_lossy(),
        pattern,
        registry.len()
    );

    let harness = Harness::new(registry);
    let report = if config.parallel {
        harness.run_parallel(input.as_bytes(), &pattern)
    } else {
        harness.run(input.as_bytes(), &pattern)
    };

    log_consistency(&report);
    print!("{}", render(&report, config.json)?);
    Ok(())
}

fn log_consistency(report: &Report) {
    match report.consistency() {
        Consistency::Agreed {
            hit_count,
            strategies,
        } => info!("{} exact strategies agree on {} hits", strategies, hit_count),
        Consistency::Divergent { counts } => {
            warn!("Exact strategies disagree: {:?}", counts)
        }
        Consistency::Unchecked => debug!("No exact strategy completed"),
    }
    if report.failures() > 0 {
        warn!("{} strategies failed", report.failures());
    }
}

/// Render the report as text lines or pretty JSON.
fn render(report: &Report, json: bool) -> anyhow::Result<String> {
    if json {
        let output = Output {
            report,
            consistency: report.consistency(),
        };
        let mut text = serde_json::to_string_pretty(&output)?;
        text.push('\n');
        Ok(text)
    } else {
        Ok(report.to_string())
    }
}
