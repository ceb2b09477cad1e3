//! Streaming download of a release asset over the installed bundle.

use futures::{Stream, StreamExt};
use reqwest::{Client, Response};
use reqwest::header::CONTENT_LENGTH;
use std::path::Path;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

use crate::core::{InstallerError, Result};

/// Download `url` into `dest`, truncating whatever was there.
///
/// The number of bytes written must equal the response's `Content-Length`
/// header, compared as decimal text. A missing header therefore counts as a
/// mismatch. Returns the number of bytes written.
pub async fn download_to_file(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let response = request(client, url).await?;
    write_response(response, url, dest).await
}

/// Send the GET for `url` and reject any status of 300 or above.
///
/// Nothing on disk is touched until the response is handed to
/// [`write_response`].
pub async fn request(client: &Client, url: &str) -> Result<Response> {
    debug!("Downloading {url}");

    let response = client.get(url).send().await.map_err(|source| {
        error!("Failed to download {url}: {source}");
        InstallerError::RequestFailed {
            url: url.to_string(),
            source,
        }
    })?;

    let status = response.status();
    if status.as_u16() >= 300 {
        error!("Failed to download {url}: {status}");
        return Err(InstallerError::HttpStatus {
            url: url.to_string(),
            status,
        });
    }

    Ok(response)
}

/// Stream the body of `response` into `dest` and check it against the
/// declared `Content-Length`.
pub async fn write_response(response: Response, url: &str, dest: &Path) -> Result<u64> {
    let declared = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .await
        .map_err(|source| {
            error!("Failed to create {}: {source}", dest.display());
            InstallerError::FileOpen {
                path: dest.to_path_buf(),
                source,
            }
        })?;

    let written = copy_body(response.bytes_stream(), &mut file, url, dest, &declared).await?;

    file.flush().await.map_err(|source| InstallerError::FileWrite {
        path: dest.to_path_buf(),
        source,
    })?;

    verify_length(&declared, written)?;

    info!("Downloaded {written} bytes to {}", dest.display());
    Ok(written)
}

/// Write every chunk of `body` to `file`, returning the byte count.
///
/// A body that fails before the declared length was reached is reported as
/// [`InstallerError::Truncated`], the same outcome as a short clean body.
/// Timeouts are transfer failures, not truncation.
pub async fn copy_body<S, B>(
    body: S,
    file: &mut File,
    url: &str,
    dest: &Path,
    declared: &str,
) -> Result<u64>
where
    S: Stream<Item = reqwest::Result<B>>,
    B: AsRef<[u8]>,
{
    let mut body = std::pin::pin!(body);
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(source) => {
                if !source.is_timeout()
                    && declared.parse::<u64>().is_ok_and(|expected| written < expected)
                {
                    error!("Body of {url} ended after {written} of {declared} bytes: {source}");
                    return Err(InstallerError::Truncated {
                        expected: declared.to_string(),
                        read: written,
                    });
                }
                error!("Failed to read body of {url}: {source}");
                return Err(InstallerError::Transfer {
                    url: url.to_string(),
                    source,
                });
            }
        };

        let bytes = chunk.as_ref();
        file.write_all(bytes).await.map_err(|source| {
            error!("Failed to download to {}: {source}", dest.display());
            InstallerError::FileWrite {
                path: dest.to_path_buf(),
                source,
            }
        })?;
        written += bytes.len() as u64;
    }

    Ok(written)
}

/// Compare the byte count with the declared `Content-Length` text.
pub fn verify_length(declared: &str, written: u64) -> Result<()> {
    let read = written.to_string();
    if read != declared {
        let err = InstallerError::Truncated {
            expected: declared.to_string(),
            read: written,
        };
        error!("{err}");
        return Err(err);
    }
    Ok(())
}
