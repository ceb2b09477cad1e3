use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::time::Duration;

use crate::config::InstallerConfig;
use crate::updater::Updater;

/// Show the installed and latest build hashes.
///
/// ```bash
/// potatocord-installer status
/// potatocord-installer status --timeout 10 --json
/// ```
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Stop waiting for the release server after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StatusReport<'a> {
    installed_hash: &'a str,
    latest_hash: &'a str,
    up_to_date: bool,
    dev_install: bool,
    bundle_path: String,
    error: Option<String>,
}

impl StatusCommand {
    pub async fn execute(self, config: InstallerConfig) -> Result<()> {
        let mut updater = Updater::new(config)?;
        updater.initialize().await;

        let fetched = match self.timeout {
            Some(secs) => updater.wait_for_release_timeout(Duration::from_secs(secs)).await,
            None => updater.wait_for_release().await,
        };

        let state = updater.state();
        let report = StatusReport {
            installed_hash: &state.installed_hash,
            latest_hash: &state.latest_hash,
            up_to_date: state.is_up_to_date(),
            dev_install: state.is_dev_install,
            bundle_path: updater.bundle_path().display().to_string(),
            error: updater.release_error().map(ToString::to_string),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Bundle:    {}", report.bundle_path);
        println!("Installed: {}", report.installed_hash.cyan());
        println!("Latest:    {}", report.latest_hash.cyan());

        if report.dev_install {
            println!("{}", "Dev install: remote update checks are disabled".yellow());
        } else if !fetched {
            if let Some(error) = &report.error {
                println!("{} {}", "Could not fetch the latest release:".red(), error);
            }
        } else if report.up_to_date {
            println!("{}", "Up to date".green());
        } else {
            println!("{}", "Outdated - run `potatocord-installer install`".yellow());
        }

        Ok(())
    }
}
