//! Build hash detection for the locally installed bundle.
//!
//! A built bundle carries a marker comment such as `// Potatocord 4f1c2d9`.
//! The word after the product name is the build hash that gets compared with
//! the latest release. Bundles from the upstream project use `// Vencord`,
//! which is accepted too.

use regex::bytes::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tokio::fs;
use tracing::debug;

use crate::constants::{BUNDLE_MARKER_PATTERN, DEV_ENTRY_SCRIPT};

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(BUNDLE_MARKER_PATTERN).expect("bundle marker pattern is a valid regex")
});

/// File that actually holds the marker: the bundle itself, or the entry script
/// when the bundle path is a development checkout directory.
///
/// Returns `None` when nothing exists at `bundle_path`.
pub async fn marker_file(bundle_path: &Path) -> Option<PathBuf> {
    let metadata = fs::metadata(bundle_path).await.ok()?;

    if metadata.is_dir() {
        Some(bundle_path.join(DEV_ENTRY_SCRIPT))
    } else {
        Some(bundle_path.to_path_buf())
    }
}

/// Read the installed bundle and return its embedded build hash.
///
/// Missing or unreadable files and bundles without a marker all yield `None`.
pub async fn detect_installed_hash(bundle_path: &Path) -> Option<String> {
    let file = marker_file(bundle_path).await?;
    let contents = fs::read(&file).await.ok()?;

    debug!("Found existing Potatocord install at {}. Checking for hash...", file.display());

    match extract_marker_hash(&contents) {
        Some(hash) => {
            debug!("Existing hash is {hash}");
            Some(hash)
        }
        None => {
            debug!("Didn't find hash");
            None
        }
    }
}

/// First marker hash found in `contents`.
#[must_use]
pub fn extract_marker_hash(contents: &[u8]) -> Option<String> {
    MARKER
        .captures(contents)
        .and_then(|captures| captures.get(2))
        .map(|hash| String::from_utf8_lossy(hash.as_bytes()).into_owned())
}
