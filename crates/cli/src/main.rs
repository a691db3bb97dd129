//! Verkada poller CLI.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Drive one poll run via the shared client library.
//! - Emit the JSON report on stdout; logs go to stderr.
//!
//! Does NOT handle:
//! - Scheduling (run it from cron every 15 minutes).
//! - Core fetch/retry/auth logic (see `crates/client`).
//!
//! Invariants:
//! - `.env` is loaded BEFORE CLI parsing so clap env fallbacks see it.
//! - stdout carries nothing but the machine-parseable report.

mod args;
mod error;
mod run;

use args::Cli;
use clap::Parser;
use error::{ExitCode, ExitCodeExt};
use secrecy::SecretString;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use verkada_client::TimeWindow;
use verkada_config::ConfigLoader;

#[tokio::main]
async fn main() {
    // Load .env before CLI parsing so clap env defaults can read .env values.
    let loader = ConfigLoader::new().load_dotenv();

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = loader
        .from_env()
        .and_then(|loader| {
            loader
                .with_api_key(cli.api_key.map(|k| SecretString::new(k.into())))
                .with_base_url(cli.base_url)
                .with_max_retries(cli.max_retries)
                .with_timeout(cli.timeout.map(Duration::from_secs))
                .with_page_size(cli.page_size)
                .with_credential_path(cli.credential_path)
                .build()
        });
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(ExitCode::GeneralError.as_i32());
        }
    };

    // Both-or-neither is enforced by clap; validity of the pair is checked
    // here so the failure maps to a validation exit code.
    let window = match (cli.start, cli.end) {
        (Some(start), Some(end)) => match TimeWindow::new(start, end) {
            Ok(window) => Some(window),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(ExitCode::from(&e).as_i32());
            }
        },
        _ => None,
    };

    if let Err(e) = run::run(&config, window, cli.pretty).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(e.exit_code().as_i32());
    }
}
