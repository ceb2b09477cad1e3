//! Give files written under `sudo` back to the invoking user.
//!
//! The installer is commonly run with `sudo` on Linux so it can patch a
//! system-wide Discord install. Files it writes into the user's config
//! directory would then belong to root and the desktop app could not update
//! them later.

use std::path::Path;
use tracing::{debug, warn};

/// Best-effort ownership fix. Failures are logged and otherwise ignored.
pub fn fix_ownership(path: &Path) {
    match try_fix_ownership(path) {
        Ok(true) => debug!("Fixed ownership of {}", path.display()),
        Ok(false) => {}
        Err(e) => warn!("Failed to fix ownership of {}: {e}", path.display()),
    }
}

/// Chown `path` to `SUDO_UID`/`SUDO_GID` when both are set.
///
/// Returns whether anything was changed.
#[cfg(unix)]
pub fn try_fix_ownership(path: &Path) -> std::io::Result<bool> {
    let (Some(uid), Some(gid)) = (sudo_id("SUDO_UID"), sudo_id("SUDO_GID")) else {
        return Ok(false);
    };

    std::os::unix::fs::chown(path, Some(uid), Some(gid))?;
    Ok(true)
}

/// No-op on platforms without Unix ownership.
#[cfg(not(unix))]
pub fn try_fix_ownership(_path: &Path) -> std::io::Result<bool> {
    Ok(false)
}

/// Give `to` the owner and group of `from`. Best-effort like [`fix_ownership`].
pub fn copy_ownership(from: &Path, to: &Path) {
    if let Err(e) = try_copy_ownership(from, to) {
        warn!("Failed to copy ownership of {} to {}: {e}", from.display(), to.display());
    }
}

#[cfg(unix)]
fn try_copy_ownership(from: &Path, to: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::MetadataExt;

    let metadata = std::fs::metadata(from)?;
    std::os::unix::fs::chown(to, Some(metadata.uid()), Some(metadata.gid()))
}

#[cfg(not(unix))]
fn try_copy_ownership(_from: &Path, _to: &Path) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn sudo_id(name: &str) -> Option<u32> {
    std::env::var(name).ok()?.parse().ok()
}
