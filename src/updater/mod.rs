//! Update coordination for the installed Potatocord bundle.
//!
//! [`Updater`] owns everything the update flow needs: configuration, the
//! release fetcher, the [`InstallState`] hashes, and the background release
//! check. It is created once per process.
//!
//! # Update Process Flow
//!
//! ```text
//! 1. initialize()
//!    ├── dev install? ── yes ──> release check settles immediately
//!    ├── no ───────────────────> spawn release check (background task)
//!    └── read installed bundle, extract `// Potatocord <hash>` marker
//!
//! 2. wait_for_release()
//!    └── consume the one-shot result, record latest hash or the error
//!
//! 3. install_latest_build()
//!    ├── dev install? ── yes ──> no-op
//!    ├── pick the desktop.asar / potatocord.asar asset
//!    ├── request the asset, reject non-2xx before touching the bundle
//!    ├── back up the current bundle (owner preserved)
//!    ├── stream the asset over the bundle, check Content-Length
//!    ├── fix ownership (best-effort)
//!    └── installed hash := latest hash
//! ```
//!
//! # Failure Semantics
//!
//! Every error is logged and returned. A failed install never advances the
//! installed hash, and a failed fetch never touches the latest hash.
//!
//! # Example
//!
//! ```rust,no_run
//! use potatocord_installer::config::InstallerConfig;
//! use potatocord_installer::updater::Updater;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let mut updater = Updater::new(InstallerConfig::load().await?)?;
//! updater.initialize().await;
//!
//! if updater.wait_for_release().await && !updater.is_up_to_date() {
//!     updater.install_latest_build().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod bundle;
pub mod download;
pub mod ownership;


use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::InstallerConfig;
use crate::constants::{BUNDLE_ASSET_NAMES, UNKNOWN_INSTALLED_HASH, UNKNOWN_LATEST_HASH};
use crate::core::{InstallerError, Result};
use crate::release::{GithubRelease, ReleaseFetcher};
use backup::BackupManager;

/// Installed and latest build hashes plus the dev-install flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallState {
    /// Hash found in the installed bundle, `"None"` when unknown.
    pub installed_hash: String,
    /// Hash of the latest published release, `"Unknown"` until fetched.
    pub latest_hash: String,
    /// Remote operations are skipped for development installs.
    pub is_dev_install: bool,
}

impl InstallState {
    /// Fresh state with the placeholder hashes.
    #[must_use]
    pub fn new(is_dev_install: bool) -> Self {
        Self {
            installed_hash: UNKNOWN_INSTALLED_HASH.to_string(),
            latest_hash: UNKNOWN_LATEST_HASH.to_string(),
            is_dev_install,
        }
    }

    /// Installed and latest hashes are equal.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.installed_hash == self.latest_hash
    }
}

/// Handle to the background release check.
///
/// The result is delivered once through a one-shot channel. Dropping the
/// handle aborts the task if it is still running.
pub struct ReleaseCheck {
    receiver: oneshot::Receiver<Result<GithubRelease>>,
    task: JoinHandle<()>,
}

impl ReleaseCheck {
    /// Spawn a task fetching `url` (with `fallback_url`) on the current runtime.
    pub fn spawn(fetcher: ReleaseFetcher, url: String, fallback_url: String) -> Self {
        let (sender, receiver) = oneshot::channel();

        let task = tokio::spawn(async move {
            let result = fetcher.fetch(&url, &fallback_url).await;
            // The receiver may already be gone if the caller gave up waiting.
            let _ = sender.send(result);
        });

        Self { receiver, task }
    }

    /// Whether the task has finished (successfully or not).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the fetch result.
    pub async fn wait(mut self) -> Result<GithubRelease> {
        match (&mut self.receiver).await {
            Ok(result) => result,
            Err(_) => Err(InstallerError::Cancelled {
                reason: "the release check task stopped before reporting".to_string(),
            }),
        }
    }

    /// Abort the task. Waiting afterwards yields [`InstallerError::Cancelled`].
    pub fn abort(&self) {
        self.task.abort();
    }
}

impl Drop for ReleaseCheck {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Coordinates the release check and the bundle install.
pub struct Updater {
    config: InstallerConfig,
    fetcher: ReleaseFetcher,
    bundle_path: PathBuf,
    state: InstallState,
    release: Option<GithubRelease>,
    release_error: Option<InstallerError>,
    pending: Option<ReleaseCheck>,
}

impl Updater {
    /// Create an updater. Nothing touches the network or disk until
    /// [`initialize`](Self::initialize).
    pub fn new(config: InstallerConfig) -> Result<Self> {
        let fetcher = ReleaseFetcher::from_config(&config)?;
        let bundle_path = config.resolve_bundle_path();
        let state = InstallState::new(config.dev_install);

        Ok(Self {
            config,
            fetcher,
            bundle_path,
            state,
            release: None,
            release_error: None,
            pending: None,
        })
    }

    /// Start the release check and read the installed bundle's hash.
    ///
    /// For dev installs the release check settles immediately without any
    /// request. The local hash is read in both cases. Call this once.
    pub async fn initialize(&mut self) {
        debug!("Is dev install: {}", self.state.is_dev_install);

        if self.state.is_dev_install {
            self.pending = None;
        } else {
            self.pending = Some(ReleaseCheck::spawn(
                self.fetcher.clone(),
                self.config.release_url.clone(),
                self.config.fallback_url.clone(),
            ));
        }

        self.detect_installed_hash().await;
    }

    /// Read the installed bundle's marker hash and store it.
    ///
    /// Leaves the installed hash untouched when the bundle is missing,
    /// unreadable or has no marker.
    pub async fn detect_installed_hash(&mut self) -> &str {
        if let Some(hash) = bundle::detect_installed_hash(&self.bundle_path).await {
            self.state.installed_hash = hash;
        }
        &self.state.installed_hash
    }

    /// Wait for the release check to settle. Returns `true` when no fetch
    /// error has been recorded.
    ///
    /// The first call consumes the pending check; later calls return the
    /// recorded outcome straight away.
    pub async fn wait_for_release(&mut self) -> bool {
        if let Some(check) = self.pending.take() {
            let result = check.wait().await;
            self.record_release(result);
        }
        self.release_error.is_none()
    }

    /// Like [`wait_for_release`](Self::wait_for_release) but gives up after
    /// `timeout`, aborting the check and recording [`InstallerError::Cancelled`].
    pub async fn wait_for_release_timeout(&mut self, timeout: Duration) -> bool {
        if let Some(check) = self.pending.take() {
            let result = match tokio::time::timeout(timeout, check.wait()).await {
                Ok(result) => result,
                Err(_) => Err(InstallerError::Cancelled {
                    reason: format!("no answer from the release server after {timeout:?}"),
                }),
            };
            self.record_release(result);
        }
        self.release_error.is_none()
    }

    /// Abort a still-running release check.
    pub fn cancel_release_check(&mut self) {
        if let Some(check) = self.pending.take() {
            check.abort();
            self.record_release(Err(InstallerError::Cancelled {
                reason: "cancelled by caller".to_string(),
            }));
        }
    }

    fn record_release(&mut self, result: Result<GithubRelease>) {
        match result {
            Ok(release) => {
                self.state.latest_hash = release.latest_hash().to_string();
                self.release = Some(release);
                self.release_error = None;
                debug!("Finished fetching release data");
                debug!(
                    "Latest hash is {}, local install is {}",
                    self.state.latest_hash,
                    if self.is_up_to_date() { "up to date!" } else { "outdated!" }
                );
            }
            Err(e) => {
                error!("Release check failed: {e}");
                self.release_error = Some(e);
            }
        }
    }

    /// Download the latest bundle over the installed one.
    ///
    /// A no-op for dev installs. Waits for a pending release check first; when
    /// that check failed, its error is handed to the caller (and no longer
    /// reported by [`release_error`](Self::release_error)).
    pub async fn install_latest_build(&mut self) -> Result<()> {
        info!("Installing latest builds...");

        if self.state.is_dev_install {
            debug!("Skipping due to dev install");
            return Ok(());
        }

        if self.pending.is_some() {
            self.wait_for_release().await;
        }

        if self.release.is_none() {
            if let Some(e) = self.release_error.take() {
                error!("No release data to install from: {e}");
                return Err(e);
            }
        }

        let download_url = self
            .release
            .as_ref()
            .and_then(|release| release.find_asset(&BUNDLE_ASSET_NAMES))
            .map(|asset| asset.download_url.clone())
            .ok_or_else(|| {
                let err = InstallerError::AssetNotFound {
                    expected: BUNDLE_ASSET_NAMES.join(" or "),
                };
                error!("{err}");
                err
            })?;

        info!("Downloading {download_url}");
        // Request and status failures leave the bundle untouched.
        let response = download::request(self.fetcher.client(), &download_url).await?;

        let backup = self.prepare_backup().await;
        let result = download::write_response(response, &download_url, &self.bundle_path).await;

        if let Err(e) = result {
            if let Some(backup) = backup {
                if let Err(restore_err) = backup.restore_backup().await {
                    warn!("Failed to restore bundle backup: {restore_err}");
                }
            }
            return Err(e);
        }

        ownership::fix_ownership(&self.bundle_path);

        if let Some(backup) = backup {
            if let Err(e) = backup.cleanup_backup().await {
                warn!("Failed to remove bundle backup: {e}");
            }
        }

        self.state.installed_hash = self.state.latest_hash.clone();
        info!("Installed build {}", self.state.installed_hash);
        Ok(())
    }

    async fn prepare_backup(&self) -> Option<BackupManager> {
        if !self.config.backup {
            return None;
        }
        let is_file = tokio::fs::metadata(&self.bundle_path)
            .await
            .is_ok_and(|metadata| metadata.is_file());
        if !is_file {
            return None;
        }

        let backup = BackupManager::new(self.bundle_path.clone());
        match backup.create_backup().await {
            Ok(()) => Some(backup),
            Err(e) => {
                warn!("Continuing without a bundle backup: {e}");
                None
            }
        }
    }

    /// Current hashes and dev flag.
    #[must_use]
    pub fn state(&self) -> &InstallState {
        &self.state
    }

    /// Installed and latest hashes are equal.
    #[must_use]
    pub fn is_up_to_date(&self) -> bool {
        self.state.is_up_to_date()
    }

    /// Whether remote operations are skipped.
    #[must_use]
    pub fn is_dev_install(&self) -> bool {
        self.state.is_dev_install
    }

    /// Release data from the last successful check.
    #[must_use]
    pub fn release(&self) -> Option<&GithubRelease> {
        self.release.as_ref()
    }

    /// Error recorded by the last release check.
    #[must_use]
    pub fn release_error(&self) -> Option<&InstallerError> {
        self.release_error.as_ref()
    }

    /// Take the error recorded by the last release check, clearing it.
    pub fn take_release_error(&mut self) -> Option<InstallerError> {
        self.release_error.take()
    }

    /// Whether a release check is running and has not been waited on yet.
    #[must_use]
    pub fn is_release_check_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Location of the installed bundle.
    #[must_use]
    pub fn bundle_path(&self) -> &Path {
        &self.bundle_path
    }
}
