// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// There are no subcommands: url-warden does exactly one thing, so every
// option is a flag on the top-level command. The doc comments on each field
// become the --help text.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

use crate::checker::DEFAULT_TIMEOUT;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "url-warden",
    version = "0.1.0",
    about = "A CLI tool to check the reachability of many URLs concurrently",
    long_about = "url-warden reads a list of URLs, checks each one with an HTTP GET under a \
                  bounded concurrency budget, and reports which are reachable. Transient \
                  network failures are retried; slow servers are not.",
    allow_negative_numbers = true
)]
pub struct Cli {
    /// Path to a file with URLs, one per line (reads stdin when omitted)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Maximum number of URLs checked at the same time
    ///
    /// Values below 1 are treated as 1.
    #[arg(long, default_value_t = 5)]
    pub concurrency: i64,

    /// Per-attempt timeout in seconds
    ///
    /// Values of 0 or less fall back to the 5 second default.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs() as i64)]
    pub timeout: i64,

    /// Retries for transient network failures
    ///
    /// Negative values are treated as 0. Timeouts and HTTP error statuses
    /// are never retried.
    #[arg(long, default_value_t = 1)]
    pub retries: i64,

    /// Deadline for the whole batch, in seconds
    ///
    /// When the deadline passes, unfinished checks are abandoned and the
    /// run exits with an error after reporting the partial results.
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Directory for the valid.txt / invalid.txt split files
    #[arg(long, default_value = ".out")]
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        // clap validates flag names, conflicts and defaults here.
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_the_documented_surface() {
        let cli = Cli::parse_from(["url-warden"]);
        assert_eq!(cli.file, None);
        assert_eq!(cli.concurrency, 5);
        assert_eq!(cli.timeout, 5);
        assert_eq!(cli.retries, 1);
        assert_eq!(cli.deadline, None);
        assert!(!cli.json);
        assert_eq!(cli.out_dir, PathBuf::from(".out"));
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::parse_from([
            "url-warden",
            "--file",
            "urls.txt",
            "--concurrency",
            "10",
            "--timeout",
            "2",
            "--retries",
            "0",
            "--deadline",
            "30",
            "--json",
            "--out-dir",
            "reports",
        ]);
        assert_eq!(cli.file, Some(PathBuf::from("urls.txt")));
        assert_eq!(cli.concurrency, 10);
        assert_eq!(cli.timeout, 2);
        assert_eq!(cli.retries, 0);
        assert_eq!(cli.deadline, Some(30));
        assert!(cli.json);
        assert_eq!(cli.out_dir, PathBuf::from("reports"));
    }

    #[test]
    fn out_of_range_values_still_parse() {
        // Normalization happens later; the parser accepts them as-is.
        let cli = Cli::parse_from(["url-warden", "--concurrency", "-3", "--retries", "-1"]);
        assert_eq!(cli.concurrency, -3);
        assert_eq!(cli.retries, -1);
    }
}
