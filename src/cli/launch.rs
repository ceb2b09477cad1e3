use anyhow::{Context, Result};
use clap::Args;

use crate::config::InstallerConfig;
use crate::constants::{LAUNCHER_FILE_NAME, LAUNCHER_URL};
use crate::launcher;
use crate::release::ReleaseFetcher;

/// Download the installer executable, run it, and delete it afterwards.
///
/// Arguments after `--` are passed to the downloaded executable.
///
/// ```bash
/// potatocord-installer launch
/// potatocord-installer launch --url https://example.com/PotatocordInstallerCli -- --install
/// ```
#[derive(Args, Debug)]
pub struct LaunchCommand {
    /// Download URL of the installer executable.
    #[arg(long, default_value = LAUNCHER_URL)]
    url: String,

    /// File name to save the executable under.
    #[arg(long, default_value = LAUNCHER_FILE_NAME)]
    name: String,

    /// Arguments passed through to the executable.
    #[arg(last = true)]
    args: Vec<String>,
}

impl LaunchCommand {
    pub async fn execute(self, config: InstallerConfig) -> Result<()> {
        let fetcher = ReleaseFetcher::from_config(&config)?;

        launcher::download_and_run(fetcher.client(), &self.url, &self.name, &self.args)
            .await
            .with_context(|| format!("Failed to launch {}", self.url))
    }
}
