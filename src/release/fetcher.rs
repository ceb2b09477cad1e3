use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::types::GithubRelease;
use crate::config::InstallerConfig;
use crate::core::{InstallerError, Result};

/// Fetches release metadata, falling back to a mirror when GitHub refuses us.
///
/// The fetcher owns a single [`reqwest::Client`] configured with the installer
/// `User-Agent`. The same client is reused for asset downloads so connection
/// pooling applies everywhere. The optional timeout only bounds metadata
/// requests; bundle downloads may take as long as they need.
///
/// # Examples
///
/// ```rust,no_run
/// use potatocord_installer::release::ReleaseFetcher;
///
/// # async fn example() -> potatocord_installer::core::Result<()> {
/// let fetcher = ReleaseFetcher::new("PotatocordInstaller/0.1.0", None)?;
/// let release = fetcher
///     .fetch(
///         "https://api.github.com/repos/Potatocord/Potatocord/releases/latest",
///         "https://potatocord.dev/releases/project",
///     )
///     .await?;
/// println!("Latest build: {}", release.latest_hash());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ReleaseFetcher {
    client: Client,
    timeout: Option<Duration>,
}

impl ReleaseFetcher {
    /// Create a fetcher with the given `User-Agent` and optional request timeout.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let client =
            Client::builder().user_agent(user_agent).build().map_err(InstallerError::Client)?;
        Ok(Self { client, timeout })
    }

    /// Create a fetcher from the installer configuration.
    pub fn from_config(config: &InstallerConfig) -> Result<Self> {
        Self::new(&config.user_agent, config.request_timeout())
    }

    /// The underlying HTTP client.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetch and decode release metadata from `url`.
    ///
    /// A 401, 403 or 429 from `url` is retried exactly once against
    /// `fallback_url`. When both URLs are the same the error is returned
    /// directly. Transport failures, other non-2xx statuses and decode
    /// failures are never retried.
    pub async fn fetch(&self, url: &str, fallback_url: &str) -> Result<GithubRelease> {
        match self.fetch_once(url).await {
            Err(e) if e.is_rate_limited() && url != fallback_url => {
                error!("Failed to fetch {url} ({e}). Trying fallback url {fallback_url}");
                self.fetch_once(fallback_url).await
            }
            result => result,
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<GithubRelease> {
        debug!("Fetching {url}");

        let mut request = self.client.get(url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await.map_err(|source| {
            error!("Failed to send request to {url}: {source}");
            InstallerError::RequestFailed {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.as_u16() >= 300 {
            warn!("{url} returned non-OK status {status}");
            return Err(InstallerError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| InstallerError::Transfer {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| {
            error!("Failed to decode release JSON from {url}: {source}");
            InstallerError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}
