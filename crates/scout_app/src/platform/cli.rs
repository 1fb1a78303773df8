use std::path::PathBuf;

use clap::{value_parser, Parser};

use super::logging::LogDestination;

/// Command-line options for the `scout` binary.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "scout",
    about = "Submit a sourcing job and poll it until candidates arrive",
    version
)]
pub struct Cli {
    /// Job description text
    #[arg(long, value_name = "TEXT", conflicts_with = "file")]
    pub prompt: Option<String>,

    /// Read the job description from a file instead
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Optional GitHub campaign prompt sent with the job
    #[arg(long, value_name = "TEXT")]
    pub github_prompt: Option<String>,

    /// Base URL of the job service
    #[arg(long, env = "SCOUT_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Seconds between status checks
    #[arg(long, value_name = "SECS", value_parser = value_parser!(u64).range(1..))]
    pub poll_interval_secs: Option<u64>,

    /// Give up after this many status checks (default: no limit)
    #[arg(long, value_name = "N", value_parser = value_parser!(u32).range(1..))]
    pub max_polls: Option<u32>,

    /// Cancel the search if it has not finished after this many seconds
    #[arg(long, value_name = "SECS", value_parser = value_parser!(u64).range(1..))]
    pub deadline_secs: Option<u64>,

    /// RON settings file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write the final candidates as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Where log records go
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log_destination: LogDestination,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prompt_and_file_are_mutually_exclusive() {
        let result = Cli::try_parse_from(["scout", "--prompt", "x", "--file", "jd.txt"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let result = Cli::try_parse_from(["scout", "--poll-interval-secs", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn defaults_leave_overrides_unset() {
        let cli = Cli::try_parse_from(["scout", "--prompt", "Rust dev"]).unwrap();
        assert_eq!(cli.prompt.as_deref(), Some("Rust dev"));
        assert_eq!(cli.poll_interval_secs, None);
        assert_eq!(cli.max_polls, None);
        assert_eq!(cli.log_destination, LogDestination::File);
        assert_eq!(cli.log_level, "info");
    }
}
