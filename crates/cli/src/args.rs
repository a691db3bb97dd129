//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Parse command-line arguments and environment variables.
//!
//! Non-responsibilities:
//! - Does not execute the run (see the `run` module).
//! - Does not resolve defaults (see `verkada-config`).

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "verkada-cli")]
#[command(about = "Poll Verkada audit logs and camera notifications", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  verkada-cli\n  verkada-cli --start 1706900000 --end 1706901000\n  verkada-cli --pretty\n  VERKADA_API_KEY=... verkada-cli --base-url https://api.verkada.com\n\nWithout --start/--end the most recently completed 15-minute interval is fetched,\nso a `*/15 * * * *` cron entry tiles the timeline without gaps or overlaps.\n"
)]
pub struct Cli {
    /// Start of the time window as a Unix timestamp in seconds
    #[arg(long, requires = "end")]
    pub start: Option<u64>,

    /// End of the time window as a Unix timestamp in seconds
    #[arg(long, requires = "start")]
    pub end: Option<u64>,

    /// Verkada API key used to acquire short-lived tokens
    #[arg(short, long, env = "VERKADA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the Verkada API
    #[arg(short, long, env = "VERKADA_BASE_URL")]
    pub base_url: Option<String>,

    /// Maximum number of retries for transient request failures
    #[arg(long, env = "VERKADA_MAX_RETRIES")]
    pub max_retries: Option<usize>,

    /// Connection timeout in seconds
    #[arg(long, env = "VERKADA_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Items requested per page
    #[arg(long, env = "VERKADA_PAGE_SIZE")]
    pub page_size: Option<u64>,

    /// Path of the cached credential file
    #[arg(long, env = "VERKADA_CREDENTIAL_PATH", value_name = "FILE")]
    pub credential_path: Option<PathBuf>,

    /// Pretty-print the JSON report instead of emitting it compact
    #[arg(long)]
    pub pretty: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_start_requires_end() {
        let result = Cli::try_parse_from(["verkada-cli", "--start", "1706900000"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["verkada-cli", "--end", "1706901000"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_paired_window_accepted() {
        let cli = Cli::try_parse_from([
            "verkada-cli",
            "--start",
            "1706900000",
            "--end",
            "1706901000",
        ])
        .unwrap();
        assert_eq!(cli.start, Some(1706900000));
        assert_eq!(cli.end, Some(1706901000));
    }

    #[test]
    fn test_no_window_accepted() {
        let cli = Cli::try_parse_from(["verkada-cli"]).unwrap();
        assert!(cli.start.is_none());
        assert!(cli.end.is_none());
    }
}
