//! CLI binary for the cloud-detect crate.
//!
//! Prints the canonical provider id on stdout. Detection failure is not a
//! process error: a host on no known cloud prints `unknown` and exits 0.

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cloud_detect::{Detector, ProviderId};

#[derive(Parser)]
#[command(name = "cloud-detect")]
#[command(
    author,
    version,
    about = "Detect which cloud platform this host runs on"
)]
struct Cli {
    /// Overall detection deadline in seconds
    #[arg(short, long, default_value_t = 3)]
    timeout: u64,

    /// Only probe the given provider (repeatable)
    #[arg(short, long = "provider", value_parser = parse_provider)]
    providers: Vec<ProviderId>,

    /// Print per-probe diagnostics to stderr
    #[arg(short, long)]
    diagnostics: bool,
}

fn parse_provider(s: &str) -> Result<ProviderId, String> {
    match s.parse::<ProviderId>() {
        Ok(ProviderId::Unknown) => Err("cannot probe for provider: unknown".to_string()),
        other => other,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), reqwest::Error> {
    let mut builder = Detector::builder().timeout(Duration::from_secs(cli.timeout));
    if !cli.providers.is_empty() {
        builder = builder.providers(cli.providers.clone());
    }
    let detector = builder.build()?;

    let outcome = detector.detect().await;

    if cli.diagnostics {
        for result in outcome.results() {
            eprintln!(
                "{:<14} matched={:<5} elapsed={:>8.1?} evidence={} error={}",
                result.provider(),
                result.matched(),
                result.elapsed(),
                result.evidence().unwrap_or("-"),
                result
                    .error()
                    .map_or_else(|| "-".to_string(), |e| e.to_string()),
            );
        }
        if outcome.all_errored() {
            eprintln!("every probe errored; the host may have no network access at all");
        }
    }

    println!("{}", outcome.provider());
    Ok(())
}
