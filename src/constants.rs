//! Product constants shared by the fetcher, the updater and the CLI.
//!
//! Release endpoints, environment variable names and accepted asset names live
//! here so that the values the installer depends on are discoverable in one
//! place. Most of them can be overridden through
//! [`InstallerConfig`](crate::config::InstallerConfig).

/// GitHub API endpoint describing the latest published release.
pub const RELEASE_URL: &str = "https://api.github.com/repos/Potatocord/Potatocord/releases/latest";

/// Mirror of [`RELEASE_URL`] used when GitHub rate limits or blocks the request.
///
/// GitHub allows 60 unauthenticated requests per hour and some ISPs block it
/// entirely, so the fallback serves the same JSON document.
pub const RELEASE_URL_FALLBACK: &str = "https://potatocord.dev/releases/project";

/// Environment variables that select a development install when set to `"1"`.
pub const DEV_INSTALL_ENV_VARS: [&str; 2] = ["POTATOCORD_DEV_INSTALL", "VENCORD_DEV_INSTALL"];

/// Value a dev-install variable must hold to take effect.
pub const DEV_INSTALL_SENTINEL: &str = "1";

/// Overrides the full path of the installed bundle.
pub const BUNDLE_PATH_ENV: &str = "POTATOCORD_DIRECTORY";

/// Overrides the directory holding the installed bundle and the config file.
pub const USER_DATA_DIR_ENV: &str = "POTATOCORD_USER_DATA_DIR";

/// Overrides the location of the installer config file.
pub const CONFIG_PATH_ENV: &str = "POTATOCORD_CONFIG_PATH";

/// Directory name under the platform config dir.
pub const DATA_DIR_NAME: &str = "Potatocord";

/// File name of the installed bundle inside the data directory.
pub const BUNDLE_FILE_NAME: &str = "potatocord.asar";

/// File name of the installer config inside the data directory.
pub const CONFIG_FILE_NAME: &str = "installer.toml";

/// Entry script looked up when the bundle path is a development checkout.
pub const DEV_ENTRY_SCRIPT: &str = "main.js";

/// Release asset names accepted as the desktop bundle, in priority order.
pub const BUNDLE_ASSET_NAMES: [&str; 2] = ["desktop.asar", "potatocord.asar"];

/// Marker comment embedded in a built bundle. Group 2 captures the build hash.
pub const BUNDLE_MARKER_PATTERN: &str = r"// (Vencord|Potatocord) (\w+)";

/// Installed hash reported when no bundle (or no marker) is found.
pub const UNKNOWN_INSTALLED_HASH: &str = "None";

/// Latest hash reported until the release feed has been fetched.
pub const UNKNOWN_LATEST_HASH: &str = "Unknown";

/// Where the launcher downloads the installer executable from.
pub const LAUNCHER_URL: &str = if cfg!(windows) {
    "https://github.com/Potatocord/Installer/releases/latest/download/PotatocordInstallerCli.exe"
} else {
    "https://github.com/Potatocord/Installer/releases/latest/download/PotatocordInstallerCli-linux"
};

/// File name the launcher saves the installer executable under.
pub const LAUNCHER_FILE_NAME: &str = if cfg!(windows) {
    "PotatocordInstallerCli.exe"
} else {
    "PotatocordInstallerCli"
};

/// `User-Agent` sent with every request.
pub fn default_user_agent() -> String {
    format!(
        "PotatocordInstaller/{} (https://github.com/Potatocord/Installer)",
        env!("CARGO_PKG_VERSION")
    )
}
