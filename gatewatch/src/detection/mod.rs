//! Label detection over stored images.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod rekognition;

pub use rekognition::RekognitionDetector;

use crate::config::DetectionConfig;
use crate::storage::BoxError;

/// Label that marks a human presence.
pub const PERSON_LABEL: &str = "Person";

#[derive(Error, Debug)]
pub enum DetectionError {
    #[error("label detection request failed")]
    Service(#[source] BoxError),
}

pub type Result<T> = std::result::Result<T, DetectionError>;

/// A semantic tag returned by the detection service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Confidence in percent (0-100)
    pub confidence: f32,
}

/// Reference to an already stored object plus the detection parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectLabelsRequest {
    pub bucket: String,
    pub key: String,
    pub max_labels: i32,
    pub min_confidence: f32,
}

impl DetectLabelsRequest {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, settings: &DetectionConfig) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            max_labels: settings.max_labels,
            min_confidence: settings.min_confidence,
        }
    }
}

/// Trait for label detection backends
#[async_trait]
pub trait LabelDetector: Send + Sync {
    /// Detect labels on the object referenced by `request`. Bytes are never re-sent.
    async fn detect_labels(&self, request: &DetectLabelsRequest) -> Result<Vec<Label>>;
}

/// True when any label is exactly [`PERSON_LABEL`]. Matching is case sensitive.
pub fn contains_person(labels: &[Label]) -> bool {
    labels.iter().any(|label| label.name == PERSON_LABEL)
}
