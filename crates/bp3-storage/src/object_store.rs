//! Object stores the output tree is uploaded into.
use crate::config::{LocalConfig, S3Config, StorageConfig};
use crate::error::StorageError;
use aws_sdk_s3::config::{
    BehaviorVersion, Builder, Credentials, Region, RequestChecksumCalculation,
    ResponseChecksumValidation,
};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::future::Future;
use std::path::{Path, PathBuf};

/// A destination for uploaded files.
pub trait ObjectStore: Send + Sync {
    /// Stores the local file at `path` under `key` and returns its public URL.
    fn put_file(
        &self,
        path: &Path,
        key: &str,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}

/// `{base_url}/{key}`.
pub fn public_url(base_url: &str, key: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), key)
}

/// S3-compatible bucket using virtual-hosted style addressing.
pub struct S3Store {
    client: Client,
    bucket: String,
    base_url: String,
}

/// Client settings for an S3-compatible endpoint.
///
/// Checksums are only sent or verified when an operation requires them.
fn client_config(config: &S3Config) -> aws_sdk_s3::Config {
    let credentials = Credentials::new(
        &config.access_key_id,
        &config.secret_access_key,
        None,
        None,
        "bp3-config",
    );
    Builder::new()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .endpoint_url(&config.endpoint)
        .credentials_provider(credentials)
        .force_path_style(false)
        .request_checksum_calculation(RequestChecksumCalculation::WhenRequired)
        .response_checksum_validation(ResponseChecksumValidation::WhenRequired)
        .build()
}

impl S3Store {
    pub fn new(config: &S3Config) -> Self {
        S3Store {
            client: Client::from_conf(client_config(config)),
            bucket: config.bucket.clone(),
            base_url: config.public_access_url.clone(),
        }
    }
}

impl ObjectStore for S3Store {
    async fn put_file(&self, path: &Path, key: &str) -> Result<String, StorageError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| StorageError::upload(key, e))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::upload(key, DisplayErrorContext(e)))?;
        Ok(public_url(&self.base_url, key))
    }
}

/// Copies files below a local root directory.
pub struct LocalStore {
    root: PathBuf,
    base_url: String,
}

impl LocalStore {
    pub fn new(config: &LocalConfig) -> Self {
        LocalStore {
            root: config.root.clone(),
            base_url: config.public_access_url.clone(),
        }
    }
}

impl ObjectStore for LocalStore {
    async fn put_file(&self, path: &Path, key: &str) -> Result<String, StorageError> {
        let target = self.root.join(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::upload(key, e))?;
        }
        tokio::fs::copy(path, &target)
            .await
            .map_err(|e| StorageError::upload(key, e))?;
        Ok(public_url(&self.base_url, key))
    }
}

/// The store selected by configuration.
pub enum StorageBackend {
    S3(S3Store),
    Local(LocalStore),
}

impl StorageBackend {
    pub fn from_config(config: &StorageConfig) -> Self {
        match config {
            StorageConfig::S3(s3) => StorageBackend::S3(S3Store::new(s3)),
            StorageConfig::Local(local) => StorageBackend::Local(LocalStore::new(local)),
        }
    }
}

impl ObjectStore for StorageBackend {
    async fn put_file(&self, path: &Path, key: &str) -> Result<String, StorageError> {
        match self {
            StorageBackend::S3(store) => store.put_file(path, key).await,
            StorageBackend::Local(store) => store.put_file(path, key).await,
        }
    }
}
