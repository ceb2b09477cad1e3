//! Command-line interface for the Potatocord installer.
//!
//! # Available Commands
//!
//! - `status` - Show the installed and latest build hashes
//! - `install` - Download the latest bundle over the installed one
//! - `launch` - Download the installer executable, run it, delete it
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only print errors
//! - `--config` - Path to a custom installer config file
//!
//! # Example
//!
//! ```bash
//! potatocord-installer status
//! potatocord-installer --verbose install
//! potatocord-installer install --force
//! potatocord-installer launch -- --install
//! ```

mod install;
mod launch;
mod status;


use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::InstallerConfig;

/// Runtime configuration derived from the global CLI flags.
///
/// Kept separate from [`Cli`] so tests and embedders can drive command
/// execution without parsing arguments.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Default log filter (`"debug"`, `"info"`, `"error"`). `RUST_LOG` wins when set.
    pub log_level: Option<String>,

    /// Custom path to the installer config file.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the installer configuration this CLI run should use.
    pub async fn load_installer_config(&self) -> Result<InstallerConfig> {
        InstallerConfig::load_with_optional(self.config_path.clone())
            .await
            .context("Failed to load installer configuration")
    }
}

/// Potatocord installer and updater
#[derive(Parser)]
#[command(
    name = "potatocord-installer",
    about = "Potatocord installer - check for and install the latest Potatocord build",
    version,
    author
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output (equivalent to `RUST_LOG=debug`).
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the installer config file.
    ///
    /// Defaults to `POTATOCORD_CONFIG_PATH`, then
    /// `<config dir>/Potatocord/installer.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the installed build, the latest published build, and whether an update is needed.
    Status(status::StatusCommand),

    /// Install the latest published build over the local bundle.
    Install(install::InstallCommand),

    /// Download the installer executable, run it, and delete it afterwards.
    Launch(launch::LaunchCommand),
}

impl Cli {
    /// Execute the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    ///
    /// `--verbose` → `debug`, `--quiet` → `error`, otherwise `info`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let installer_config = config.load_installer_config().await?;

        match self.command {
            Commands::Status(cmd) => cmd.execute(installer_config).await,
            Commands::Install(cmd) => cmd.execute(installer_config).await,
            Commands::Launch(cmd) => cmd.execute(installer_config).await,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init_logging(default_level: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.unwrap_or("info")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
