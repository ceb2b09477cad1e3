//! Installer configuration.
//!
//! The installer works out of the box with built-in defaults. Every default can
//! be overridden from an optional TOML file, and a handful of environment
//! variables take precedence over the file.
//!
//! # Configuration File Location
//!
//! 1. The `--config <path>` CLI flag
//! 2. The `POTATOCORD_CONFIG_PATH` environment variable
//! 3. `<data dir>/installer.toml`, where the data dir is `POTATOCORD_USER_DATA_DIR`
//!    or the platform config dir joined with `Potatocord`
//!
//! A missing file is not an error; the defaults are used.
//!
//! # File Format
//!
//! ```toml
//! release_url = "https://api.github.com/repos/Potatocord/Potatocord/releases/latest"
//! fallback_url = "https://potatocord.dev/releases/project"
//! bundle_path = "~/.config/Potatocord/potatocord.asar"
//! request_timeout_secs = 30
//! backup = true
//! ```
//!
//! # Environment Overrides
//!
//! - `POTATOCORD_DIRECTORY` - full path of the installed bundle
//! - `POTATOCORD_USER_DATA_DIR` - directory holding the bundle and config file
//! - `POTATOCORD_DEV_INSTALL` / `VENCORD_DEV_INSTALL` - `"1"` selects a dev install

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tracing::debug;

use crate::constants::{
    BUNDLE_FILE_NAME, BUNDLE_PATH_ENV, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DATA_DIR_NAME,
    DEV_INSTALL_ENV_VARS, DEV_INSTALL_SENTINEL, RELEASE_URL, RELEASE_URL_FALLBACK,
    USER_DATA_DIR_ENV, default_user_agent,
};
use crate::core::{InstallerError, Result};

/// Settings for the release check and the bundle install.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    /// Release metadata endpoint tried first.
    pub release_url: String,

    /// Endpoint used when [`release_url`](Self::release_url) answers 401, 403 or 429.
    pub fallback_url: String,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,

    /// Installed bundle location. `~` is expanded. Defaults to
    /// `<data dir>/potatocord.asar`.
    pub bundle_path: Option<String>,

    /// Timeout for release metadata requests. Absent means no timeout.
    /// Bundle downloads are never cut off by it.
    pub request_timeout_secs: Option<u64>,

    /// Keep a `.backup` copy of the bundle while it is being overwritten.
    pub backup: bool,

    /// Skip every remote operation. Only ever set from the environment.
    #[serde(skip)]
    pub dev_install: bool,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            release_url: RELEASE_URL.to_string(),
            fallback_url: RELEASE_URL_FALLBACK.to_string(),
            user_agent: default_user_agent(),
            bundle_path: None,
            request_timeout_secs: None,
            backup: true,
            dev_install: false,
        }
    }
}

impl InstallerConfig {
    /// Load the configuration from the default location and apply the process
    /// environment on top of it.
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` when given, otherwise from [`default_path`](Self::default_path),
    /// then apply the process environment.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_path);

        let mut config = if path.exists() {
            Self::load_from(&path).await?
        } else {
            debug!("No installer config at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a config file without looking at the environment.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await.map_err(|e| InstallerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| InstallerError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Taking a lookup function instead of reading `std::env` directly keeps
    /// tests free of process-wide state.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.dev_install = is_dev_install(&lookup);

        if let Some(path) = lookup(BUNDLE_PATH_ENV).filter(|p| !p.is_empty()) {
            self.bundle_path = Some(path);
        } else if self.bundle_path.is_none() {
            if let Some(dir) = lookup(USER_DATA_DIR_ENV).filter(|d| !d.is_empty()) {
                self.bundle_path =
                    Some(PathBuf::from(dir).join(BUNDLE_FILE_NAME).to_string_lossy().into_owned());
            }
        }
    }

    /// Location of the installed bundle (a file, or a directory in dev layouts).
    #[must_use]
    pub fn resolve_bundle_path(&self) -> PathBuf {
        match &self.bundle_path {
            Some(path) => PathBuf::from(shellexpand::tilde(path).as_ref()),
            None => Self::data_dir().join(BUNDLE_FILE_NAME),
        }
    }

    /// Request timeout, if one is configured.
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Directory holding the installed bundle and the config file.
    #[must_use]
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(USER_DATA_DIR_ENV).filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join(DATA_DIR_NAME)
    }

    /// Default config file location, honouring `POTATOCORD_CONFIG_PATH`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }

        Self::data_dir().join(CONFIG_FILE_NAME)
    }
}

/// Whether either dev-install variable is set to the sentinel value.
pub fn is_dev_install<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    DEV_INSTALL_ENV_VARS
        .iter()
        .any(|name| lookup(name).as_deref() == Some(DEV_INSTALL_SENTINEL))
}
