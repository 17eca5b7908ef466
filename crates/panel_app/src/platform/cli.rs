use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::logging::LogDestination;

/// Control panel for the patent-gazette archive backend.
#[derive(Debug, Parser)]
#[command(name = "panel", version, about)]
pub struct Cli {
    /// Configuration file (RON).
    #[arg(long, env = "PANEL_CONFIG", default_value = "panel.ron")]
    pub config: PathBuf,

    /// Backend base URL, overriding the configuration file.
    #[arg(long, env = "PANEL_BASE_URL")]
    pub base_url: Option<String>,

    /// Log polling interval in milliseconds.
    #[arg(long, env = "PANEL_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Where diagnostic logs are written.
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log_destination: LogDestination,

    /// Enable debug-level diagnostics.
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Interactive panel (default).
    Interactive,
    /// Locate the largest archive at the listing URL.
    Verify {
        #[arg(long)]
        url: Option<String>,
    },
    /// Locate, download and search the largest archive.
    Process {
        #[arg(long)]
        search: String,
        #[arg(long)]
        url: Option<String>,
    },
    /// Download the last located archive.
    Download,
    /// Read the contents of the last located archive.
    Read,
    /// Probe backend health once.
    Status,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Interactive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interactive_is_the_default() {
        let cli = Cli::try_parse_from(["panel"]).unwrap();
        assert_eq!(cli.command(), Command::Interactive);
        assert_eq!(cli.log_destination, LogDestination::File);
    }

    #[test]
    fn process_requires_search() {
        assert!(Cli::try_parse_from(["panel", "process"]).is_err());
        let cli = Cli::try_parse_from(["panel", "process", "--search", "foo"]).unwrap();
        assert_eq!(
            cli.command(),
            Command::Process {
                search: "foo".to_string(),
                url: None
            }
        );
    }

    #[test]
    fn base_url_flag_is_captured() {
        let cli =
            Cli::try_parse_from(["panel", "--base-url", "http://10.0.0.2:5000", "status"]).unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.2:5000"));
        assert_eq!(cli.command(), Command::Status);
    }
}
