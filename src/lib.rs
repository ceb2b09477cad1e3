//! Potatocord installer - checks the release feed and installs the latest bundle.
//!
//! The installer keeps a locally installed Potatocord bundle (`potatocord.asar`)
//! in sync with the latest published build:
//!
//! - The build hash of a release is the last word of its name
//!   (`"Potatocord 4f1c2d9"` → `4f1c2d9`).
//! - The installed hash is read from the `// Potatocord <hash>` marker comment
//!   embedded in the bundle.
//! - Equal hashes mean the install is up to date; otherwise the bundle asset of
//!   the latest release is downloaded over the local file.
//!
//! # Modules
//!
//! - [`release`] - release metadata types and the fetcher with its rate-limit fallback
//! - [`updater`] - [`updater::Updater`], hash detection, download and install
//! - [`launcher`] - download, run and delete the installer executable
//! - [`config`] - defaults, optional TOML file and environment overrides
//! - [`core`] - error types and user-facing error rendering
//! - [`cli`] - the `potatocord-installer` command line
//! - [`constants`] - endpoints, environment variable names, asset names
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Show installed and latest build hashes
//! potatocord-installer status
//!
//! # Install the latest build (no-op when already up to date)
//! potatocord-installer install
//!
//! # Development checkout: skip every remote operation
//! POTATOCORD_DEV_INSTALL=1 potatocord-installer status
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod launcher;
pub mod release;
pub mod updater;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
