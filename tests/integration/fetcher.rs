//! Release fetch against a local mock server.

use anyhow::Result;
use mockito::Server;
use potatocord_installer::core::InstallerError;
use potatocord_installer::release::ReleaseFetcher;
use potatocord_installer::test_utils::release_json;

fn fetcher() -> ReleaseFetcher {
    ReleaseFetcher::new("PotatocordInstaller/test", None).unwrap()
}

#[tokio::test]
async fn test_fetch_decodes_release() -> Result<()> {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("GET", "/releases/latest")
        .match_header("user-agent", "PotatocordInstaller/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(release_json("4f1c2d9", "desktop.asar", "https://example.com/desktop.asar"))
        .create_async()
        .await;

    let url = format!("{}/releases/latest", server.url());
    let fallback = format!("{}/fallback", server.url());
    let release = fetcher().fetch(&url, &fallback).await?;

    assert_eq!(release.latest_hash(), "4f1c2d9");
    assert_eq!(release.assets.len(), 1);
    assert_eq!(release.assets[0].download_url, "https://example.com/desktop.asar");
    primary.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_primary_uses_fallback() -> Result<()> {
    let mut server = Server::new_async().await;
    let primary = server
        .mock("GET", "/releases/latest")
        .with_status(429)
        .expect(1)
        .create_async()
        .await;
    let fallback = server
        .mock("GET", "/fallback")
        .with_status(200)
        .with_body(release_json("abc1234", "desktop.asar", "https://example.com/desktop.asar"))
        .expect(1)
        .create_async()
        .await;

    let release = fetcher()
        .fetch(&format!("{}/releases/latest", server.url()), &format!("{}/fallback", server.url()))
        .await?;

    assert_eq!(release.latest_hash(), "abc1234");
    primary.assert_async().await;
    fallback.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_unauthorized_and_forbidden_use_fallback() -> Result<()> {
    for status in [401, 403] {
        let mut server = Server::new_async().await;
        server.mock("GET", "/releases/latest").with_status(status).create_async().await;
        let fallback = server
            .mock("GET", "/fallback")
            .with_status(200)
            .with_body(release_json("abc1234", "desktop.asar", "https://example.com/a"))
            .expect(1)
            .create_async()
            .await;

        let release = fetcher()
            .fetch(
                &format!("{}/releases/latest", server.url()),
                &format!("{}/fallback", server.url()),
            )
            .await?;

        assert_eq!(release.latest_hash(), "abc1234", "status {status}");
        fallback.assert_async().await;
    }
    Ok(())
}

#[tokio::test]
async fn test_fallback_failure_is_final() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/releases/latest").with_status(429).create_async().await;
    let fallback =
        server.mock("GET", "/fallback").with_status(429).expect(1).create_async().await;

    let err = fetcher()
        .fetch(&format!("{}/releases/latest", server.url()), &format!("{}/fallback", server.url()))
        .await
        .unwrap_err();

    match err {
        InstallerError::HttpStatus { url, status } => {
            assert!(url.ends_with("/fallback"));
            assert_eq!(status.as_u16(), 429);
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_same_url_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock =
        server.mock("GET", "/releases/latest").with_status(403).expect(1).create_async().await;

    let url = format!("{}/releases/latest", server.url());
    let err = fetcher().fetch(&url, &url).await.unwrap_err();

    assert!(err.is_rate_limited());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_error_does_not_use_fallback() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/releases/latest").with_status(500).create_async().await;
    let fallback =
        server.mock("GET", "/fallback").with_status(200).expect(0).create_async().await;

    let err = fetcher()
        .fetch(&format!("{}/releases/latest", server.url()), &format!("{}/fallback", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, InstallerError::HttpStatus { status, .. } if status.as_u16() == 500));
    assert_eq!(
        err.to_string(),
        format!("{}/releases/latest returned non-OK status 500 Internal Server Error", server.url())
    );
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/releases/latest")
        .with_status(200)
        .with_body("<html>definitely not json</html>")
        .create_async()
        .await;
    let fallback = server.mock("GET", "/fallback").expect(0).create_async().await;

    let err = fetcher()
        .fetch(&format!("{}/releases/latest", server.url()), &format!("{}/fallback", server.url()))
        .await
        .unwrap_err();

    assert!(matches!(err, InstallerError::Decode { .. }));
    fallback.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_request_failure() {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/releases/latest");
    let err = fetcher().fetch(&url, "http://127.0.0.1:9/fallback").await.unwrap_err();

    assert!(matches!(err, InstallerError::RequestFailed { .. }));
}
