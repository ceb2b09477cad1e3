use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::time::Duration;
use tracing::debug;

use crate::config::InstallerConfig;
use crate::updater::Updater;

/// Install the latest published build.
///
/// Does nothing when the installed build already matches the latest one,
/// unless `--force` is given.
///
/// ```bash
/// potatocord-installer install
/// potatocord-installer install --force
/// ```
#[derive(Args, Debug)]
pub struct InstallCommand {
    /// Reinstall even when the installed build is up to date.
    #[arg(short, long)]
    force: bool,

    /// Stop waiting for the release server after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,
}

impl InstallCommand {
    pub async fn execute(self, config: InstallerConfig) -> Result<()> {
        let mut updater = Updater::new(config)?;
        updater.initialize().await;

        if updater.is_dev_install() {
            println!("{}", "Dev install detected, skipping update".yellow());
            return Ok(());
        }

        let fetched = match self.timeout {
            Some(secs) => updater.wait_for_release_timeout(Duration::from_secs(secs)).await,
            None => updater.wait_for_release().await,
        };
        if !fetched {
            if let Some(error) = updater.take_release_error() {
                return Err(error).context("Failed to fetch the latest release");
            }
        }

        if updater.is_up_to_date() && !self.force {
            println!(
                "{} Potatocord {} is already installed",
                "✓".green(),
                updater.state().installed_hash
            );
            return Ok(());
        }

        debug!(
            "Updating {} -> {}",
            updater.state().installed_hash,
            updater.state().latest_hash
        );
        updater.install_latest_build().await.context("Failed to install the latest build")?;

        println!(
            "{} Installed Potatocord {} to {}",
            "✓".green(),
            updater.state().installed_hash,
            updater.bundle_path().display()
        );
        Ok(())
    }
}
