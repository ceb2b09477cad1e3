//! Test utilities shared by unit and integration tests.
//!
//! Available under `cfg(test)` and with the `test-utils` feature.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, tests run without log output.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// JSON body of a release named `Potatocord <hash>` whose only asset is
/// `asset_name`, downloadable from `download_url`.
#[must_use]
pub fn release_json(hash: &str, asset_name: &str, download_url: &str) -> String {
    serde_json::json!({
        "name": format!("Potatocord {hash}"),
        "tag_name": "devbuild",
        "assets": [
            { "name": asset_name, "browser_download_url": download_url }
        ]
    })
    .to_string()
}
