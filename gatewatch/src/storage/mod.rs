//! Object storage for uploaded images.
//!
//! Every accepted upload is written here before it is classified, and the URL returned by the
//! store becomes the lookup key for identity records. Objects are never deleted by this service.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub mod s3;

pub use s3::S3ObjectStore;

/// Bucket that receives every upload.
pub const UPLOAD_BUCKET: &str = "your-bucket-name";

/// Key prefix for uploaded images.
pub const UPLOAD_PREFIX: &str = "uploads";

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum StorageError {
    /// The store rejected or failed the write
    #[error("failed to upload object {key}")]
    Upload {
        key: String,
        #[source]
        source: BoxError,
    },

    /// The object was written but no URL could be derived for it
    #[error("could not build URL for object {key}: {reason}")]
    Url { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// An object to be written.
#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub content: Bytes,
    pub content_type: String,
}

/// Where a written object lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    /// Canonical retrievable address of the object
    pub url: String,
}

/// Trait for object storage backends
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write the object and return its canonical location
    async fn put(&self, request: PutObjectRequest) -> Result<StoredObject>;
}

/// Build the storage key for an upload: `uploads/<epoch millis>-<original file name>`.
///
/// Two uploads with the same file name in the same millisecond collide; the later one wins.
pub fn upload_key(uploaded_at: DateTime<Utc>, file_name: &str) -> String {
    format!("{}/{}-{}", UPLOAD_PREFIX, uploaded_at.timestamp_millis(), file_name)
}
