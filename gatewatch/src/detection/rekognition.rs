//! Amazon Rekognition `DetectLabels` backend.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_rekognition::{
    Client,
    error::DisplayErrorContext,
    types::{Image, S3Object},
};
use tracing::instrument;

use super::{DetectLabelsRequest, DetectionError, Label, LabelDetector, Result};

pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }

    /// Use a pre-built client (custom endpoints, tests)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LabelDetector for RekognitionDetector {
    #[instrument(skip(self, request), fields(bucket = %request.bucket, key = %request.key), err)]
    async fn detect_labels(&self, request: &DetectLabelsRequest) -> Result<Vec<Label>> {
        let image = Image::builder()
            .s3_object(S3Object::builder().bucket(&request.bucket).name(&request.key).build())
            .build();

        let output = self
            .client
            .detect_labels()
            .image(image)
            .max_labels(request.max_labels)
            .min_confidence(request.min_confidence)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %DisplayErrorContext(&e), "Rekognition DetectLabels failed");
                DetectionError::Service(Box::new(e))
            })?;

        let labels: Vec<Label> = output
            .labels()
            .iter()
            .filter_map(|label| {
                label.name().map(|name| Label {
                    name: name.to_string(),
                    confidence: label.confidence().unwrap_or_default(),
                })
            })
            .collect();

        tracing::debug!(count = labels.len(), "Detected labels");
        Ok(labels)
    }
}
