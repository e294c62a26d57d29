use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to download file from {url}: {reason}")]
    Download { url: String, reason: String },

    #[error("no usable content-length reported for {url}")]
    MissingContentLength { url: String },

    #[error("failed to upload {key}: {reason}")]
    Upload { key: String, reason: String },

    #[error("invalid storage configuration: {0}")]
    Config(String),

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub(crate) fn download(url: &str, reason: impl std::fmt::Display) -> Self {
        StorageError::Download {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn upload(key: &str, reason: impl std::fmt::Display) -> Self {
        StorageError::Upload {
            key: key.to_string(),
            reason: reason.to_string(),
        }
    }
}
