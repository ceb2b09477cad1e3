//! The compiled `potatocord-installer` binary.

use assert_cmd::Command;
use mockito::Server;
use potatocord_installer::test_utils::release_json;
use predicates::prelude::*;
use serial_test::serial;
use std::path::Path;
use tempfile::TempDir;

const BUNDLE: &str = "// Potatocord abc1234\nconsole.log(\"bundle\");\n";

/// Command isolated from the caller's environment.
fn installer_cmd(temp: &Path, bundle: &Path) -> Command {
    let mut cmd = Command::cargo_bin("potatocord-installer").unwrap();
    cmd.env_remove("POTATOCORD_DEV_INSTALL")
        .env_remove("VENCORD_DEV_INSTALL")
        .env_remove("POTATOCORD_USER_DATA_DIR")
        .env_remove("RUST_LOG")
        .env("POTATOCORD_DIRECTORY", bundle)
        .env("POTATOCORD_CONFIG_PATH", temp.join("missing.toml"))
        .env("NO_COLOR", "1");
    cmd
}

fn write_config(temp: &Path, server: &Server) -> std::path::PathBuf {
    let path = temp.join("installer.toml");
    let content = format!(
        "release_url = \"{url}/releases/latest\"\nfallback_url = \"{url}/fallback\"\nrequest_timeout_secs = 10\n",
        url = server.url()
    );
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
#[serial]
fn test_status_json_for_dev_install() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");
    std::fs::write(&bundle, BUNDLE).unwrap();

    let output = installer_cmd(temp.path(), &bundle)
        .env("POTATOCORD_DEV_INSTALL", "1")
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["installed_hash"], "abc1234");
    assert_eq!(report["latest_hash"], "Unknown");
    assert_eq!(report["dev_install"], true);
    assert_eq!(report["error"], serde_json::Value::Null);
}

#[test]
#[serial]
fn test_vencord_dev_install_alias() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");

    installer_cmd(temp.path(), &bundle)
        .env("VENCORD_DEV_INSTALL", "1")
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Dev install detected"));
    assert!(!bundle.exists());
}

#[test]
#[serial]
fn test_status_reports_latest_hash() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");
    std::fs::write(&bundle, "// Potatocord old0000\n").unwrap();

    let mut server = Server::new();
    server
        .mock("GET", "/releases/latest")
        .with_body(release_json("abc1234", "desktop.asar", "https://example.com/desktop.asar"))
        .create();
    let config = write_config(temp.path(), &server);

    installer_cmd(temp.path(), &bundle)
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("old0000"))
        .stdout(predicate::str::contains("abc1234"))
        .stdout(predicate::str::contains("Outdated"));
}

#[test]
#[serial]
fn test_install_downloads_bundle() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");

    let mut server = Server::new();
    let asset_url = format!("{}/desktop.asar", server.url());
    server
        .mock("GET", "/releases/latest")
        .with_body(release_json("abc1234", "desktop.asar", &asset_url))
        .create();
    let download = server.mock("GET", "/desktop.asar").with_body(BUNDLE).expect(1).create();
    let config = write_config(temp.path(), &server);

    installer_cmd(temp.path(), &bundle)
        .arg("--config")
        .arg(&config)
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed Potatocord abc1234"));

    assert_eq!(std::fs::read_to_string(&bundle).unwrap(), BUNDLE);
    download.assert();
}

#[test]
#[serial]
fn test_install_skips_when_up_to_date() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");
    std::fs::write(&bundle, BUNDLE).unwrap();

    let mut server = Server::new();
    let asset_url = format!("{}/desktop.asar", server.url());
    server
        .mock("GET", "/releases/latest")
        .with_body(release_json("abc1234", "desktop.asar", &asset_url))
        .create();
    let download = server.mock("GET", "/desktop.asar").expect(0).create();
    let config = write_config(temp.path(), &server);

    installer_cmd(temp.path(), &bundle)
        .arg("--config")
        .arg(&config)
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("already installed"));

    download.assert();
}

#[test]
#[serial]
fn test_install_fails_when_release_server_errors() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");

    let mut server = Server::new();
    server.mock("GET", "/releases/latest").with_status(500).create();
    let config = write_config(temp.path(), &server);

    installer_cmd(temp.path(), &bundle)
        .arg("--config")
        .arg(&config)
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to fetch the latest release"))
        .stderr(predicate::str::contains("try again later"));
    assert!(!bundle.exists());
}

#[test]
#[serial]
fn test_invalid_config_file() {
    let temp = TempDir::new().unwrap();
    let bundle = temp.path().join("potatocord.asar");
    let config = temp.path().join("installer.toml");
    std::fs::write(&config, "release_url = [not toml").unwrap();

    installer_cmd(temp.path(), &bundle)
        .arg("--config")
        .arg(&config)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid installer configuration"))
        .stderr(predicate::str::contains("Fix or remove the installer config file"));
}
