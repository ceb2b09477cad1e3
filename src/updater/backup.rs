use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::ownership;
use crate::core::Result;

/// Keeps a copy of the installed bundle while a new one is downloaded over it.
///
/// The copy lives next to the bundle with a `.backup` suffix
/// (`potatocord.asar` → `potatocord.asar.backup`). A failed download restores
/// it; a successful one removes it.
///
/// # Examples
///
/// ```rust,no_run
/// use potatocord_installer::updater::backup::BackupManager;
/// use std::path::PathBuf;
///
/// # async fn example() -> potatocord_installer::core::Result<()> {
/// let backup = BackupManager::new(PathBuf::from("/home/me/.config/Potatocord/potatocord.asar"));
/// backup.create_backup().await?;
///
/// let download_failed = true;
/// if download_failed {
///     backup.restore_backup().await?;
/// } else {
///     backup.cleanup_backup().await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct BackupManager {
    original_path: PathBuf,
    backup_path: PathBuf,
}

impl BackupManager {
    /// Create a manager for the bundle at `bundle_path`.
    pub fn new(bundle_path: PathBuf) -> Self {
        let mut backup_path = bundle_path.clone();
        backup_path.set_file_name(format!(
            "{}.backup",
            bundle_path.file_name().unwrap_or_default().to_string_lossy()
        ));

        Self {
            original_path: bundle_path,
            backup_path,
        }
    }

    /// Copy the bundle to the backup location, replacing an older backup.
    ///
    /// The copy keeps the owner and group of the bundle so a restore does not
    /// change who owns it.
    pub async fn create_backup(&self) -> Result<()> {
        if fs::try_exists(&self.backup_path).await? {
            debug!("Removing old backup at {}", self.backup_path.display());
            fs::remove_file(&self.backup_path).await?;
        }

        info!("Creating backup at {}", self.backup_path.display());
        fs::copy(&self.original_path, &self.backup_path).await?;
        // A copy made under sudo belongs to root; keep the bundle's owner.
        ownership::copy_ownership(&self.original_path, &self.backup_path);
        Ok(())
    }

    /// Put the backup back in place of the (possibly half-written) bundle.
    ///
    /// The backup file is consumed.
    pub async fn restore_backup(&self) -> Result<()> {
        warn!("Restoring bundle from backup at {}", self.backup_path.display());

        if fs::try_exists(&self.original_path).await? {
            fs::remove_file(&self.original_path).await?;
        }
        fs::rename(&self.backup_path, &self.original_path).await?;

        info!("Restored {}", self.original_path.display());
        Ok(())
    }

    /// Remove the backup after a successful install.
    pub async fn cleanup_backup(&self) -> Result<()> {
        if fs::try_exists(&self.backup_path).await? {
            debug!("Cleaning up backup at {}", self.backup_path.display());
            fs::remove_file(&self.backup_path).await?;
        }
        Ok(())
    }

    /// Whether a backup file currently exists.
    pub fn backup_exists(&self) -> bool {
        self.backup_path.exists()
    }

    /// Location of the backup file.
    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }
}
