use serde::{Deserialize, Serialize};

/// One published release as described by the GitHub releases API.
///
/// The fallback mirror serves the same shape, so both endpoints decode into
/// this type. Only the fields the installer reads are modelled; anything else
/// in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubRelease {
    /// Display name, e.g. `"Potatocord 4f1c2d9"`. The build hash is the last word.
    #[serde(default)]
    pub name: String,
    /// Git tag the release was cut from.
    #[serde(default)]
    pub tag_name: String,
    /// Downloadable files attached to the release.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A named downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseAsset {
    /// File name of the asset.
    pub name: String,
    /// Direct download URL.
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
}

impl GithubRelease {
    /// The build hash published with this release.
    #[must_use]
    pub fn latest_hash(&self) -> &str {
        latest_hash_from_name(&self.name)
    }

    /// First asset, in release order, whose name is one of `names`.
    #[must_use]
    pub fn find_asset(&self, names: &[&str]) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|asset| names.contains(&asset.name.as_str()))
    }
}

/// Substring after the last space of a release name (the whole name if it has none).
#[must_use]
pub fn latest_hash_from_name(name: &str) -> &str {
    match name.rfind(' ') {
        Some(index) => &name[index + 1..],
        None => name,
    }
}
