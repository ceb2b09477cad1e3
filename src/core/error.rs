//! Error handling for the Potatocord installer
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** so callers can branch on the failure kind
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`InstallerError`] - every failure the fetcher, updater and launcher report
//! - [`ErrorContext`] - a rendered message plus optional details and suggestion
//!
//! Library code returns `Result<T, InstallerError>`; the CLI layer works with
//! [`anyhow::Error`] and calls [`user_friendly_error`] once, right before exiting.
//!
//! # Examples
//!
//! ```rust,no_run
//! use potatocord_installer::core::{InstallerError, user_friendly_error};
//!
//! let error = InstallerError::AssetNotFound {
//!     expected: "desktop.asar".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Prints a coloured error with a suggestion
//! ```

use colored::Colorize;
use reqwest::StatusCode;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for installer operations
///
/// Variants map one-to-one onto the failure kinds of the update flow:
///
/// - **Network**: [`Client`], [`RequestFailed`], [`HttpStatus`], [`Decode`], [`Transfer`], [`Cancelled`]
/// - **Release content**: [`AssetNotFound`]
/// - **Local filesystem**: [`FileOpen`], [`FileWrite`], [`Truncated`], [`Io`]
/// - **Setup**: [`Config`], [`Launch`]
///
/// Ownership-fix failures never surface as an error; they are logged and dropped.
///
/// [`Client`]: InstallerError::Client
/// [`RequestFailed`]: InstallerError::RequestFailed
/// [`HttpStatus`]: InstallerError::HttpStatus
/// [`Decode`]: InstallerError::Decode
/// [`Transfer`]: InstallerError::Transfer
/// [`Cancelled`]: InstallerError::Cancelled
/// [`AssetNotFound`]: InstallerError::AssetNotFound
/// [`FileOpen`]: InstallerError::FileOpen
/// [`FileWrite`]: InstallerError::FileWrite
/// [`Truncated`]: InstallerError::Truncated
/// [`Io`]: InstallerError::Io
/// [`Config`]: InstallerError::Config
/// [`Launch`]: InstallerError::Launch
#[derive(Error, Debug)]
pub enum InstallerError {
    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be built or sent (DNS, TLS, connection refused, ...)
    #[error("Failed to send request to {url}: {source}")]
    RequestFailed {
        /// The URL that was requested
        url: String,
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a status code of 300 or above
    #[error("{url} returned non-OK status {status}")]
    HttpStatus {
        /// The URL that was requested
        url: String,
        /// The status line returned by the server
        status: StatusCode,
    },

    /// The release endpoint returned a body that is not valid release JSON
    #[error("Failed to decode release metadata from {url}: {source}")]
    Decode {
        /// The URL the body came from
        url: String,
        /// The JSON error
        #[source]
        source: serde_json::Error,
    },

    /// The response body stream failed before it was complete
    #[error("Failed to read response body from {url}: {source}")]
    Transfer {
        /// The URL being downloaded
        url: String,
        /// The underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The release has no asset with one of the accepted bundle names
    #[error("Didn't find {expected} download link")]
    AssetNotFound {
        /// Human-readable list of accepted asset names
        expected: String,
    },

    /// The destination file could not be created or opened for writing
    #[error("Failed to create {}: {source}", path.display())]
    FileOpen {
        /// The destination path
        path: PathBuf,
        /// The I/O error
        #[source]
        source: std::io::Error,
    },

    /// Writing downloaded bytes to the destination failed
    #[error("Failed to download to {}: {source}", path.display())]
    FileWrite {
        /// The destination path
        path: PathBuf,
        /// The I/O error
        #[source]
        source: std::io::Error,
    },

    /// Fewer (or more) bytes were written than the server declared
    #[error("Unexpected end of input. Content-Length was {expected}, but I only read {read}")]
    Truncated {
        /// The raw `Content-Length` header value, empty when absent
        expected: String,
        /// Number of bytes actually written
        read: u64,
    },

    /// The background release check ended without producing a result
    #[error("Release check cancelled: {reason}")]
    Cancelled {
        /// Why the check did not finish
        reason: String,
    },

    /// The installer configuration could not be loaded
    #[error("Invalid installer configuration at {}: {reason}", path.display())]
    Config {
        /// The config file path
        path: PathBuf,
        /// Why loading failed
        reason: String,
    },

    /// The downloaded installer could not be run or exited unsuccessfully
    #[error("Launcher failed: {reason}")]
    Launch {
        /// What went wrong
        reason: String,
    },

    /// Any other I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// Whether this is an auth / rate-limit / blocked response (401, 403 or 429).
    ///
    /// Only these statuses make the release fetcher switch to its fallback URL.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::HttpStatus { status, .. } if is_rate_limited_status(*status))
    }
}

/// Statuses that indicate the release endpoint refused us rather than failed.
#[must_use]
pub fn is_rate_limited_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    )
}

/// Error message with optional details and a suggestion, ready for display
///
/// # Examples
///
/// ```rust,no_run
/// use potatocord_installer::core::ErrorContext;
///
/// let context = ErrorContext::new("download failed")
///     .with_suggestion("Check your network connection")
///     .with_details("The release server did not answer");
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The rendered error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with only a message
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    ///
    /// Suggestions are actionable steps and are displayed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error (displayed in yellow)
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with suggestions
///
/// Recognises [`InstallerError`] and [`std::io::Error`] anywhere in the
/// error chain; everything else is rendered with its full context chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(installer_error) = cause.downcast_ref::<InstallerError>() {
            return create_error_context(message, installer_error);
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        return match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorContext::new(message)
                .with_suggestion(
                    "Try running with elevated permissions (sudo/Administrator) or check file ownership",
                ),
            std::io::ErrorKind::NotFound => ErrorContext::new(message)
                .with_suggestion("Check that the file or directory exists and the path is correct"),
            _ => ErrorContext::new(message),
        };
    }

    ErrorContext::new(message)
}

fn create_error_context(message: String, error: &InstallerError) -> ErrorContext {
    match error {
        InstallerError::RequestFailed { .. } | InstallerError::Transfer { .. } => {
            ErrorContext::new(message)
                .with_suggestion("Check your internet connection and try again")
        }
        InstallerError::HttpStatus { .. } if error.is_rate_limited() => {
            ErrorContext::new(message)
                .with_details("GitHub and the fallback mirror both refused the request")
                .with_suggestion("Wait a while before retrying; unauthenticated GitHub requests are limited to 60 per hour")
        }
        InstallerError::HttpStatus { .. } => ErrorContext::new(message)
            .with_suggestion("The release server may be down; try again later"),
        InstallerError::Cancelled { .. } => ErrorContext::new(message)
            .with_suggestion("Check your internet connection or raise request_timeout_secs"),
        InstallerError::Decode { .. } => ErrorContext::new(message)
            .with_details("The release endpoint returned a response that is not release metadata"),
        InstallerError::AssetNotFound { .. } => ErrorContext::new(message)
            .with_details("The latest release does not contain a desktop bundle")
            .with_suggestion("Try again once the release has finished publishing"),
        InstallerError::FileOpen { .. } | InstallerError::FileWrite { .. } => {
            ErrorContext::new(message).with_suggestion(
                "Close Potatocord and check that you can write to the install directory",
            )
        }
        InstallerError::Truncated { .. } => ErrorContext::new(message)
            .with_details("The download ended before the declared size was reached")
            .with_suggestion("Run the install again"),
        InstallerError::Config { .. } => ErrorContext::new(message)
            .with_suggestion("Fix or remove the installer config file"),
        InstallerError::Client(_) | InstallerError::Launch { .. } | InstallerError::Io(_) => {
            ErrorContext::new(message)
        }
    }
}
