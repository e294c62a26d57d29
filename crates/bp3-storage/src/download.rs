//! HTTP download of input files.
use crate::config::ProxyConfig;
use crate::error::StorageError;
use log::{error, info};
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, NoProxy, Proxy};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// 100 MiB.
pub const DEFAULT_MAX_CONTENT_LENGTH: u64 = 100 * 1024 * 1024;

/// Builds the HTTP client used for downloads.
///
/// With the proxy disabled the client connects directly and ignores the
/// `HTTP(S)_PROXY` environment variables.
pub fn http_client(proxy: &ProxyConfig) -> Result<Client, StorageError> {
    let builder = Client::builder();
    let builder = if proxy.enabled {
        let url = proxy
            .url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| StorageError::Config("proxy is enabled but no url is set".into()))?;
        let mut exclude = proxy.exclude.clone();
        exclude.extend(["localhost".to_string(), "127.0.0.1".to_string()]);
        let proxy = Proxy::all(url)
            .map_err(|e| StorageError::Config(format!("proxy url {url}: {e}")))?
            .no_proxy(NoProxy::from_string(&exclude.join(",")));
        info!("routing downloads through proxy {url}");
        builder.proxy(proxy)
    } else {
        builder.no_proxy()
    };
    builder
        .build()
        .map_err(|e| StorageError::Config(e.to_string()))
}

/// File name of a URL: the last path segment, query stripped, percent-decoded.
///
/// `https://host/path/name.pdb?x=1&y=2` gives `name.pdb`.
pub fn extract_filename(url: &str) -> String {
    let segment = url.rsplit('/').next().unwrap_or_default();
    let segment = segment.split('?').next().unwrap_or_default();
    String::from_utf8_lossy(&urlencoding::decode_binary(segment.as_bytes())).into_owned()
}

pub struct Downloader {
    client: Client,
    max_content_length: u64,
}

impl Downloader {
    pub fn new(client: Client, max_content_length: u64) -> Self {
        Downloader {
            client,
            max_content_length,
        }
    }

    pub fn max_content_length(&self) -> u64 {
        self.max_content_length
    }

    /// Streams `url` into `staging_dir/<file name>` and returns that path.
    ///
    /// The directory is created if needed. There is no retry, and a file cut
    /// short by a failing transfer is left in place.
    pub async fn download(&self, url: &str, staging_dir: &Path) -> Result<PathBuf, StorageError> {
        info!("downloading file from {url}");
        let filename = extract_filename(url);
        // a decoded `%2F` must not move the file out of the staging directory
        let filename = Path::new(&filename)
            .file_name()
            .filter(|name| *name == filename.as_str())
            .ok_or_else(|| StorageError::download(url, "url does not end in a file name"))?
            .to_owned();

        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| {
                error!("failed to download file: {e}");
                StorageError::download(url, e)
            })?;

        fs::create_dir_all(staging_dir).await?;
        let path = staging_dir.join(filename);
        let mut file = File::create(&path).await?;
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| StorageError::download(url, e))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!("downloaded {url} to {}", path.display());
        Ok(path)
    }

    /// `content-length` reported by a HEAD request.
    pub async fn content_length(&self, url: &str) -> Result<u64, StorageError> {
        let response = self
            .client
            .head(url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| StorageError::download(url, e))?;
        response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .ok_or_else(|| StorageError::MissingContentLength {
                url: url.to_string(),
            })
    }

    /// Whether the file behind `url` is within the configured maximum size.
    pub async fn check_file_size(&self, url: &str) -> Result<bool, StorageError> {
        Ok(self.content_length(url).await? <= self.max_content_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename_strips_query() {
        assert_eq!(
            extract_filename("https://host/path/name.pdb?x=1&y=2"),
            "name.pdb"
        );
    }

    #[test]
    fn test_extract_filename_decodes() {
        assert_eq!(
            extract_filename("https://host/files/my%20protein%281%29.fasta"),
            "my protein(1).fasta"
        );
        assert_eq!(
            extract_filename("https://host/%E8%9B%8B%E7%99%BD.pdb"),
            "蛋白.pdb"
        );
    }

    #[test]
    fn test_extract_filename_without_path() {
        assert_eq!(extract_filename("name.pdb"), "name.pdb");
        assert_eq!(extract_filename("https://host/dir/"), "");
    }

    #[test]
    fn test_enabled_proxy_requires_url() {
        let proxy = ProxyConfig {
            enabled: true,
            url: None,
            exclude: vec![],
        };
        assert!(matches!(http_client(&proxy), Err(StorageError::Config(_))));
    }

    #[test]
    fn test_proxy_client_builds() {
        let proxy = ProxyConfig {
            enabled: true,
            url: Some("http://127.0.0.1:7890".into()),
            exclude: vec!["internal.example.com".into()],
        };
        assert!(http_client(&proxy).is_ok());
        assert!(http_client(&ProxyConfig::default()).is_ok());
    }
}
