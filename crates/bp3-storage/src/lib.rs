//! # bp3-storage
//!
//! File transfer for the prediction service:
//!
//! * [`Downloader`] fetches input files over HTTP into a staging directory.
//! * [`upload_directory`] mirrors a local output tree into an [`ObjectStore`]
//!   and returns the public URLs in the same shape.
//!
//! Two stores are provided: [`S3Store`] for S3-compatible services and
//! [`LocalStore`], which copies into a directory and is handy for development.
mod config;
mod download;
mod error;
mod object_store;
mod upload;

pub use self::config::{LocalConfig, ProxyConfig, S3Config, StorageConfig};
pub use self::download::{extract_filename, http_client, Downloader, DEFAULT_MAX_CONTENT_LENGTH};
pub use self::error::StorageError;
pub use self::object_store::{public_url, LocalStore, ObjectStore, S3Store, StorageBackend};
pub use self::upload::{upload_directory, ArtifactTree, UploadFailure, UploadOptions, UploadReport};
