//! Release feed access.
//!
//! - [`GithubRelease`] / [`ReleaseAsset`]: the decoded release document
//! - [`ReleaseFetcher`]: HTTP GET with a single fallback on 401/403/429
//! - [`latest_hash_from_name`]: the build hash is the last word of the release name
//!
//! ```text
//! fetch(url, fallback)
//!   ├── GET url ──────────── 2xx ──> decode JSON
//!   ├── 401/403/429 and url != fallback
//!   │     └── GET fallback ─ 2xx ──> decode JSON (any failure is final)
//!   └── anything else ─────────────> error
//! ```

pub mod fetcher;
pub mod types;

pub use fetcher::ReleaseFetcher;
pub use types::{GithubRelease, ReleaseAsset, latest_hash_from_name};
