//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use lookey_core::types::UserId;

/// LooKey -- shelf scanning and product locating for visually impaired shoppers.
///
/// Use `lookey <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "lookey", version, about, long_about = None)]
pub struct Cli {
    /// Path to the lookey.toml configuration file.
    #[arg(short, long, default_value = "lookey.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a shelf and match it against a shopping list.
    Scan(ScanArgs),

    /// Locate a product relative to the current camera frame.
    Locate(LocateArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Send shelf photos to the detector and report matches.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// User the scan belongs to.
    #[arg(short, long)]
    pub user: UserId,

    /// Shelf photo (repeat for each image).
    #[arg(long = "image", value_name = "FILE", required = true)]
    pub images: Vec<PathBuf>,

    /// Shopping list entry (repeat for each item). Without any, the detected shelf is listed.
    #[arg(long = "item", value_name = "NAME")]
    pub items: Vec<String>,
}

// ---- locate ----

/// Scan the shelf, then resolve where the product is from the current frame.
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// User the scan belongs to.
    #[arg(short, long)]
    pub user: UserId,

    /// Shelf photo (repeat for each image).
    #[arg(long = "image", value_name = "FILE", required = true)]
    pub images: Vec<PathBuf>,

    /// Photo of what the camera currently sees.
    #[arg(long, value_name = "FILE")]
    pub frame: PathBuf,

    /// Product to look for.
    #[arg(short, long)]
    pub product: String,
}

// ---- config ----

/// Manage lookey configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, detector, cache, locator, catalog).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_scan_with_items() {
        let cli = Cli::try_parse_from([
            "lookey", "scan", "--user", "7", "--image", "a.jpg", "--image", "b.jpg", "--item",
            "콜라", "--item", "새우깡",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.user, 7);
                assert_eq!(
                    args.images,
                    vec![PathBuf::from("a.jpg"), PathBuf::from("b.jpg")]
                );
                assert_eq!(args.items, vec!["콜라".to_owned(), "새우깡".to_owned()]);
            }
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_without_items() {
        let cli = Cli::try_parse_from(["lookey", "scan", "-u", "1", "--image", "a.jpg"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Scan(args) => assert!(args.items.is_empty()),
            _ => panic!("expected Scan command"),
        }
    }

    #[test]
    fn test_cli_parse_scan_requires_image() {
        let args = Cli::try_parse_from(["lookey", "scan", "--user", "1"]);
        assert!(args.is_err(), "scan without --image should fail");
    }

    #[test]
    fn test_cli_parse_scan_rejects_non_numeric_user() {
        let args = Cli::try_parse_from(["lookey", "scan", "--user", "alice", "--image", "a.jpg"]);
        assert!(args.is_err(), "user id must be numeric");
    }

    #[test]
    fn test_cli_parse_locate() {
        let cli = Cli::try_parse_from([
            "lookey",
            "locate",
            "--user",
            "3",
            "--image",
            "shelf.jpg",
            "--frame",
            "now.jpg",
            "--product",
            "코카콜라",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Locate(args) => {
                assert_eq!(args.user, 3);
                assert_eq!(args.frame, PathBuf::from("now.jpg"));
                assert_eq!(args.product, "코카콜라");
            }
            _ => panic!("expected Locate command"),
        }
    }

    #[test]
    fn test_cli_parse_locate_requires_frame() {
        let args = Cli::try_parse_from([
            "lookey", "locate", "--user", "3", "--image", "shelf.jpg", "--product", "cola",
        ]);
        assert!(args.is_err(), "locate without --frame should fail");
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["lookey", "config", "show", "--section", "cache"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => assert_eq!(section, Some("cache".to_owned())),
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_validate() {
        let cli = Cli::try_parse_from(["lookey", "config", "validate"]).expect("parse succeeded");
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                action: ConfigAction::Validate
            })
        ));
    }

    #[test]
    fn test_cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "lookey",
            "-c",
            "/etc/lookey/lookey.toml",
            "config",
            "validate",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/etc/lookey/lookey.toml"));
        assert_eq!(cli.log_level, Some("debug".to_owned()));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["lookey", "config", "validate"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("lookey.toml"));
        assert!(cli.log_level.is_none());
        assert!(matches!(cli.output, OutputFormat::Text));
    }

    #[test]
    fn test_cli_parse_missing_command_fails() {
        assert!(Cli::try_parse_from(["lookey"]).is_err());
    }

    #[test]
    fn test_cli_verify_command_structure() {
        let cmd = Cli::command();
        assert_eq!(cmd.get_name(), "lookey");

        let subcommands: Vec<_> = cmd.get_subcommands().map(|s| s.get_name()).collect();
        for expected in ["scan", "locate", "config"] {
            assert!(
                subcommands.contains(&expected),
                "should have '{expected}' subcommand"
            );
        }
    }
}
