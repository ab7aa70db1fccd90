//! Command-line interface definitions for hostop.
//!
//! Uses clap's derive API for type-safe argument parsing. The same surface
//! doubles as the protocol for the detached removal process: the parent
//! relaunches itself with `--after=<delay> --reset=<id>`.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::duration::parse_duration;
use crate::hosts::marker::is_valid_id;

/// Temporarily block hostnames via the hosts file.
///
/// hostop appends a marked block redirecting each hostname to 127.0.0.1,
/// then removes exactly that block once the delay has passed. By default
/// the removal runs in a detached copy of hostop so the shell returns
/// immediately.
#[derive(Parser, Debug)]
#[command(name = "hostop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hostnames to block.
    pub hosts: Vec<String>,

    /// How long the block stays in place (e.g. 30m, 1h30m, 90s).
    ///
    /// With `--reset`, the time to wait before removing the block.
    #[arg(short = 'a', long = "after", value_name = "DURATION", value_parser = parse_duration)]
    pub after: Option<Duration>,

    /// Remove the block with this identifier after the delay.
    ///
    /// This is how the detached removal process is invoked. It can also be
    /// used by hand to lift a block early with `--after=0s`.
    #[arg(long = "reset", value_name = "ID", value_parser = parse_block_id, conflicts_with = "hosts")]
    pub reset: Option<String>,

    /// Hosts file to edit.
    #[arg(short = 'f', long = "hosts-file", value_name = "PATH")]
    pub hosts_file: Option<PathBuf>,

    /// Wait for the delay in this process instead of a detached one.
    #[arg(long = "foreground")]
    pub foreground: bool,

    /// List the blocks currently in the hosts file and exit.
    #[arg(short = 'l', long = "list", conflicts_with_all = ["reset", "hosts"])]
    pub list: bool,

    /// Path to additional config file.
    ///
    /// This config file is merged on top of system and user configs,
    /// giving it the highest priority (except for CLI flags).
    #[arg(short = 'c', long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the active blocks.
    List,
    /// Wait, then remove the block with this id.
    Remove(String),
    /// Write a new block for these hosts and schedule its removal.
    Block(Vec<String>),
}

impl Cli {
    /// Select the invocation mode from the parsed flags.
    ///
    /// `--reset` takes precedence over block creation.
    pub fn mode(&self) -> Mode {
        if self.list {
            Mode::List
        } else if let Some(ref id) = self.reset {
            Mode::Remove(id.clone())
        } else {
            Mode::Block(self.hosts.clone())
        }
    }
}

/// Validate a block identifier given on the command line.
fn parse_block_id(id: &str) -> Result<String, String> {
    if is_valid_id(id) {
        Ok(id.to_string())
    } else {
        Err(format!(
            "'{}' is not a valid block id (must be non-empty, without whitespace)",
            id.escape_debug()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_basic() {
        let cli = Cli::parse_from(["hostop", "a.com", "b.com"]);
        assert_eq!(cli.hosts, vec!["a.com", "b.com"]);
        assert!(cli.after.is_none());
        assert!(cli.reset.is_none());
        assert!(!cli.foreground);
        assert_eq!(cli.verbose, 0);
        assert_eq!(
            cli.mode(),
            Mode::Block(vec!["a.com".to_string(), "b.com".to_string()])
        );
    }

    #[test]
    fn test_cli_parse_after() {
        let cli = Cli::parse_from(["hostop", "-a", "1h30m", "a.com"]);
        assert_eq!(cli.after, Some(Duration::from_secs(5400)));

        let cli = Cli::parse_from(["hostop", "--after=90s", "a.com"]);
        assert_eq!(cli.after, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_cli_rejects_bad_duration() {
        let result = Cli::try_parse_from(["hostop", "--after", "soon", "a.com"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_relaunch_protocol() {
        let cli = Cli::parse_from([
            "hostop",
            "--after=1h0m0s",
            "--reset=0b6f1c9e-5d0e-4f5c-9a43-2f8e1d7c6b10",
            "--hosts-file=/tmp/hosts",
        ]);

        assert_eq!(cli.after, Some(Duration::from_secs(3600)));
        assert_eq!(cli.hosts_file, Some(PathBuf::from("/tmp/hosts")));
        assert_eq!(
            cli.mode(),
            Mode::Remove("0b6f1c9e-5d0e-4f5c-9a43-2f8e1d7c6b10".to_string())
        );
    }

    #[test]
    fn test_cli_reset_conflicts_with_hosts() {
        let result = Cli::try_parse_from(["hostop", "--reset=abc", "a.com"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_reset_rejects_whitespace_id() {
        let result = Cli::try_parse_from(["hostop", "--reset", "a b"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_list() {
        let cli = Cli::parse_from(["hostop", "--list", "-f", "/tmp/hosts"]);
        assert_eq!(cli.mode(), Mode::List);

        assert!(Cli::try_parse_from(["hostop", "--list", "a.com"]).is_err());
    }

    #[test]
    fn test_cli_verbosity_and_config() {
        let cli = Cli::parse_from(["hostop", "-vv", "-c", "/tmp/extra.toml", "--foreground", "x.org"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/extra.toml")));
        assert!(cli.foreground);
    }
}
