//! Dataset download with a progress bar.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Response};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};
use url::Url;

/// Downloads dataset files over HTTP.
pub struct DatasetFetcher {
    client: Client,
}

impl DatasetFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("redentor/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Download `url` to `output` unless it already exists (or `force` is set).
    ///
    /// Returns `true` if a download happened.
    pub async fn fetch(&self, url: &str, output: &Path, force: bool) -> Result<bool> {
        if output.exists() && !force {
            info!("{} already present, skipping download", output.display());
            return Ok(false);
        }

        let url = Url::parse(url).with_context(|| format!("Invalid dataset URL: {}", url))?;
        info!("Downloading {}", url);

        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context("Dataset request failed")?;

        if !response.status().is_success() {
            bail!("Dataset download failed with status {}", response.status());
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let pb = match response.content_length() {
            Some(len) => {
                let pb = ProgressBar::new(len);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template(
                            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})",
                        )?
                        .progress_chars("#>-"),
                );
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(file_name(&url));

        let partial = partial_path(output);
        let written = match stream_to_file(&mut response, &partial, output, &pb).await {
            Ok(written) => written,
            Err(e) => {
                pb.abandon_with_message("Download failed");
                if let Err(rm) = fs::remove_file(&partial).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        warn!("Could not remove {}: {}", partial.display(), rm);
                    }
                }
                return Err(e);
            }
        };
        pb.finish_with_message("Download complete");

        info!("Wrote {} bytes to {}", written, output.display());
        Ok(true)
    }
}

/// Stream the response body into `partial`, then move it onto `output`.
async fn stream_to_file(
    response: &mut Response,
    partial: &Path,
    output: &Path,
    pb: &ProgressBar,
) -> Result<u64> {
    let mut file = File::create(partial)
        .await
        .with_context(|| format!("Failed to create {}", partial.display()))?;

    let mut written = 0u64;
    while let Some(chunk) = response.chunk().await.context("Failed reading response")? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        pb.inc(chunk.len() as u64);
    }
    file.flush().await?;
    drop(file);

    fs::rename(partial, output)
        .await
        .with_context(|| format!("Failed to move download into {}", output.display()))?;
    Ok(written)
}

/// Sibling path the download streams into before being renamed.
fn partial_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    output.with_file_name(name)
}

fn file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut s| s.next_back())
        .unwrap_or("dataset")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Answer a single HTTP request with `response`, then close the connection.
    async fn serve_once(response: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(&response).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{}/009_buildings.csv.gz", addr)
    }

    fn http_response(status: &str, content_length: usize, body: &[u8]) -> Vec<u8> {
        let mut response = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status, content_length
        )
        .into_bytes();
        response.extend_from_slice(body);
        response
    }

    fn local_fetcher() -> DatasetFetcher {
        DatasetFetcher {
            client: Client::builder().no_proxy().build().unwrap(),
        }
    }

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("data/009_buildings.csv.gz")),
            PathBuf::from("data/009_buildings.csv.gz.part")
        );
    }

    #[test]
    fn test_file_name() {
        let url = Url::parse(crate::config::DEFAULT_DATASET_URL).unwrap();
        assert_eq!(file_name(&url), "009_buildings.csv.gz");
    }

    #[tokio::test]
    async fn test_existing_file_is_not_refetched() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("buildings.csv");
        std::fs::write(&output, "latitude,longitude\n").unwrap();

        let fetcher = DatasetFetcher::new().unwrap();
        let downloaded = fetcher
            .fetch("http://127.0.0.1:9/never-contacted", &output, false)
            .await
            .unwrap();
        assert!(!downloaded);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = DatasetFetcher::new().unwrap();
        let result = fetcher
            .fetch("not a url", &dir.path().join("out.csv"), false)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_download_writes_body() {
        let body = b"latitude,longitude\n-22.9519,-43.2105\n";
        let url = serve_once(http_response("200 OK", body.len(), body)).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data").join("buildings.csv");

        let downloaded = local_fetcher().fetch(&url, &output, false).await.unwrap();
        assert!(downloaded);
        assert_eq!(std::fs::read(&output).unwrap(), body);
        assert!(!partial_path(&output).exists());
    }

    #[tokio::test]
    async fn test_force_replaces_existing_file() {
        let body = b"id,latitude,longitude\nnew,-22.9,-43.2\n";
        let url = serve_once(http_response("200 OK", body.len(), body)).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("buildings.csv");
        std::fs::write(&output, "stale").unwrap();

        assert!(local_fetcher().fetch(&url, &output, true).await.unwrap());
        assert_eq!(std::fs::read(&output).unwrap(), body);
    }

    #[tokio::test]
    async fn test_gzip_body_stored_verbatim() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"latitude,longitude\n-22.9519,-43.2105\n").unwrap();
        let gz = encoder.finish().unwrap();

        let mut response = format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nContent-Encoding: gzip\r\nConnection: close\r\n\r\n",
            gz.len()
        )
        .into_bytes();
        response.extend_from_slice(&gz);
        let url = serve_once(response).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("buildings.csv.gz");

        assert!(local_fetcher().fetch(&url, &output, false).await.unwrap());
        assert_eq!(std::fs::read(&output).unwrap(), gz);
    }

    #[tokio::test]
    async fn test_error_status_leaves_no_file() {
        let url = serve_once(http_response("404 Not Found", 9, b"not found")).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("buildings.csv");

        let result = local_fetcher().fetch(&url, &output, false).await;
        assert!(result.is_err());
        assert!(!output.exists());
        assert!(!partial_path(&output).exists());
    }

    #[tokio::test]
    async fn test_truncated_body_removes_partial() {
        // Declares more bytes than it sends, then hangs up
        let url = serve_once(http_response("200 OK", 1000, b"latitude,longitude\n")).await;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("buildings.csv");

        let result = local_fetcher().fetch(&url, &output, false).await;
        assert!(result.is_err());
        assert!(!output.exists());
        assert!(!partial_path(&output).exists());
    }
}
