//! LooKey CLI -- shelf scanning and product locating from the command line

mod cli;
mod commands;
mod error;
mod images;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;
use tracing::error;

use lookey_core::config::{GeneralConfig, LookeyConfig};

use crate::cli::{Cli, Commands};
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // config errors are reported by the command itself
    let general = LookeyConfig::load(&cli.config)
        .await
        .map(|config| config.general)
        .unwrap_or_else(|_| GeneralConfig::default());

    if let Err(e) = logging::init_tracing(&general, cli.log_level.as_deref()) {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }

    lookey_core::metrics::describe_all();

    let writer = OutputWriter::new(cli.output);
    let result = match cli.command {
        Commands::Scan(args) => commands::scan::execute(args, &cli.config, &writer).await,
        Commands::Locate(args) => commands::locate::execute(args, &cli.config, &writer).await,
        Commands::Config(args) => commands::config::execute(args, &cli.config, &writer).await,
    };

    if let Err(e) = result {
        error!(error = %e, exit_code = e.exit_code(), "command failed");
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}
