//! Core types shared by every part of the installer
//!
//! ## `error` - Error Handling
//!
//! - [`InstallerError`] - typed failures of the fetch, install and launch flows
//! - [`ErrorContext`] - user-facing rendering with details and suggestions
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display
//!
//! # Error Handling Pattern
//!
//! ```rust,no_run
//! use potatocord_installer::core::{InstallerError, user_friendly_error};
//!
//! fn example_operation() -> anyhow::Result<()> {
//!     Err(InstallerError::AssetNotFound { expected: "desktop.asar".to_string() }.into())
//! }
//!
//! if let Err(e) = example_operation() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;

pub use error::{ErrorContext, InstallerError, is_rate_limited_status, user_friendly_error};

/// Result alias used by the library modules.
pub type Result<T, E = InstallerError> = std::result::Result<T, E>;
