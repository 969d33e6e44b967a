//! Command-line argument parsing for keyseq
//!
//! Supports:
//! - Feeding key tokens through the dispatcher with a console host
//! - Listing bindings (text or JSON)
//! - Switching the persisted enabled flag

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Emacs-style key sequence dispatcher
#[derive(Parser, Debug)]
#[command(name = "keyseq", version, about = "Emacs-style key sequence dispatcher")]
pub struct CliArgs {
    /// Keymap file to load instead of the layered defaults
    #[arg(long, value_name = "FILE")]
    pub keymap: Option<PathBuf>,

    /// Engine config file (enabled flag and reserved keys)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretend the focused target accepts text (edit mode)
    #[arg(long)]
    pub writable: bool,

    /// Pretend caret browsing is on (caret mode)
    #[arg(long)]
    pub caret: bool,

    /// More console logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Feed key tokens (e.g. `C-u 4 C-n`) through the dispatcher
    Play {
        #[arg(value_name = "KEY", required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Print the loaded bindings
    List {
        /// Only this mode (global, view, edit, caret, menu)
        #[arg(long)]
        mode: Option<String>,
        /// Only bindings starting with this sequence, e.g. "C-x"
        #[arg(long, allow_hyphen_values = true)]
        prefix: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Enable key handling
    Enable,
    /// Disable key handling
    Disable,
    /// Toggle key handling (refuses to enable without bindings)
    Toggle,
    /// Print whether key handling is enabled
    Status,
}

impl CliArgs {
    /// Config file to read and persist to
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(crate::config_paths::config_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("keyseq").chain(args.iter().copied()))
            .expect("should parse")
    }

    #[test]
    fn test_play_keys() {
        let args = parse(&["play", "C-u", "4", "C-n"]);
        assert_eq!(
            args.command,
            CliCommand::Play {
                keys: vec!["C-u".to_string(), "4".to_string(), "C-n".to_string()]
            }
        );
    }

    #[test]
    fn test_play_accepts_hyphen_tokens() {
        let args = parse(&["play", "-", "M--"]);
        assert!(matches!(args.command, CliCommand::Play { keys } if keys == ["-", "M--"]));
    }

    #[test]
    fn test_play_requires_keys() {
        assert!(CliArgs::try_parse_from(["keyseq", "play"]).is_err());
    }

    #[test]
    fn test_list_options() {
        let args = parse(&["--writable", "list", "--mode", "edit", "--prefix", "C-x", "--json"]);
        assert!(args.writable);
        assert_eq!(
            args.command,
            CliCommand::List {
                mode: Some("edit".to_string()),
                prefix: Some("C-x".to_string()),
                json: true,
            }
        );
    }

    #[test]
    fn test_verbosity_counts() {
        let args = parse(&["-vv", "status"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.command, CliCommand::Status);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = parse(&["--config", "/tmp/keyseq.yaml", "status"]);
        assert_eq!(args.config_path(), Some(PathBuf::from("/tmp/keyseq.yaml")));
    }
}
