//! One-shot launcher for the installer executable.
//!
//! Downloads the installer into a fresh temporary directory, runs it with the
//! current console attached, and deletes it again when it exits. This is the
//! same job the `irm ... | iex` PowerShell one-liner performs on Windows.

use reqwest::Client;
use std::path::Path;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::core::{InstallerError, Result};
use crate::updater::download;

/// Download `url` as `file_name`, run it with `args`, then remove it.
///
/// The process inherits stdin, stdout and stderr and is awaited. A non-zero
/// exit status is returned as [`InstallerError::Launch`]. The temporary
/// directory is removed whether or not the run succeeded.
pub async fn download_and_run(
    client: &Client,
    url: &str,
    file_name: &str,
    args: &[String],
) -> Result<()> {
    let temp_dir = TempDir::new()?;
    let exe_path = temp_dir.path().join(file_name);

    info!("Downloading {url}");
    download::download_to_file(client, url, &exe_path).await?;
    make_executable(&exe_path).await?;

    let result = run(&exe_path, args).await;

    debug!("Removing {}", temp_dir.path().display());
    temp_dir.close()?;
    result
}

async fn run(exe_path: &Path, args: &[String]) -> Result<()> {
    info!("Running {}", exe_path.display());

    let status = Command::new(exe_path).args(args).status().await.map_err(|e| {
        InstallerError::Launch {
            reason: format!("failed to start {}: {e}", exe_path.display()),
        }
    })?;

    if !status.success() {
        return Err(InstallerError::Launch {
            reason: format!("{} exited with {status}", exe_path.display()),
        });
    }
    Ok(())
}

#[cfg(unix)]
async fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
