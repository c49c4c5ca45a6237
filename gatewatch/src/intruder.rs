//! The intruder check: upload, classify, then match against known identities.
//!
//! The three collaborator calls run strictly in sequence, each depending on the previous
//! result. There are no retries and nothing is rolled back: an image that was uploaded stays in
//! the store whatever happens afterwards.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, instrument};

use crate::config::DetectionConfig;
use crate::db::IdentityRecords;
use crate::detection::{DetectLabelsRequest, LabelDetector, contains_person};
use crate::errors::Result;
use crate::storage::{ObjectStore, PutObjectRequest, UPLOAD_BUCKET, upload_key};

/// An image received from a client, held in memory for the duration of one request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// Result of a completed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// No `Person` label above the confidence threshold
    NoPerson,
    /// A person was detected and the image URL maps to a known identity
    KnownPerson { person_name: String },
    /// A person was detected but the image URL is not in the identity mapping
    UnknownPerson { image_url: String },
}

/// Long-lived collaborators, built once at startup and shared by every request.
#[derive(Clone)]
pub struct IntruderDetection {
    store: Arc<dyn ObjectStore>,
    detector: Arc<dyn LabelDetector>,
    identities: Arc<dyn IdentityRecords>,
    settings: DetectionConfig,
}

impl IntruderDetection {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        detector: Arc<dyn LabelDetector>,
        identities: Arc<dyn IdentityRecords>,
        settings: DetectionConfig,
    ) -> Self {
        Self {
            store,
            detector,
            identities,
            settings,
        }
    }

    #[instrument(skip(self, upload), fields(file_name = %upload.file_name, size = upload.content.len()), err)]
    pub async fn check(&self, upload: ImageUpload) -> Result<DetectionOutcome> {
        let key = upload_key(Utc::now(), &upload.file_name);

        let stored = self
            .store
            .put(PutObjectRequest {
                bucket: UPLOAD_BUCKET.to_string(),
                key,
                content: upload.content,
                content_type: upload.content_type,
            })
            .await?;

        let labels = self
            .detector
            .detect_labels(&DetectLabelsRequest::new(&stored.bucket, &stored.key, &self.settings))
            .await?;

        if !contains_person(&labels) {
            info!(key = %stored.key, labels = labels.len(), "No person detected");
            return Ok(DetectionOutcome::NoPerson);
        }

        match self.identities.find_by_image_url(&stored.url).await? {
            Some(record) => {
                info!(key = %stored.key, person_name = %record.person_name, "Known person detected");
                Ok(DetectionOutcome::KnownPerson {
                    person_name: record.person_name,
                })
            }
            None => {
                info!(key = %stored.key, image_url = %stored.url, "Unknown person detected");
                Ok(DetectionOutcome::UnknownPerson { image_url: stored.url })
            }
        }
    }
}
