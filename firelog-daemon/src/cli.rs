//! CLI argument definitions for firelog-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Firewall log normalization daemon.
///
/// Parses Kaspersky, TP-Link and D-Link firewall log directories into
/// normalized records and serves them over a JSON HTTP API.
#[derive(Parser, Debug)]
#[command(name = "firelog-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to firelog.toml configuration file.
    ///
    /// A missing file is not an error: built-in defaults are used.
    #[arg(short, long, default_value = "firelog.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override HTTP bind address (e.g. 127.0.0.1:8000).
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Start with empty collections instead of loading every vendor directory.
    #[arg(long)]
    pub no_initial_load: bool,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = DaemonCli::parse_from(["firelog-daemon"]);
        assert_eq!(cli.config, PathBuf::from("firelog.toml"));
        assert!(cli.log_level.is_none());
        assert!(cli.bind.is_none());
        assert!(!cli.validate);
        assert!(!cli.no_initial_load);
    }

    #[test]
    fn overrides() {
        let cli = DaemonCli::parse_from([
            "firelog-daemon",
            "-c",
            "/etc/firelog/firelog.toml",
            "--log-level",
            "debug",
            "--log-format",
            "pretty",
            "--bind",
            "127.0.0.1:9000",
            "--no-initial-load",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("/etc/firelog/firelog.toml"));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.log_format.as_deref(), Some("pretty"));
        assert_eq!(cli.bind.as_deref(), Some("127.0.0.1:9000"));
        assert!(cli.no_initial_load);
        assert!(cli.validate);
    }

    #[test]
    fn command_is_well_formed() {
        use clap::CommandFactory;
        DaemonCli::command().debug_assert();
    }
}
