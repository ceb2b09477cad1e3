//! Potatocord installer CLI entry point
//!
//! Parses arguments, sets up logging, runs the command, and renders any
//! error with a suggestion before exiting with status 1.

use anyhow::Result;
use clap::Parser;
use potatocord_installer::cli;
use potatocord_installer::core::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let config = cli.build_config();
    cli::init_logging(config.log_level.as_deref());

    match cli.execute_with_config(config).await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
