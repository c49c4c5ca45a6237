use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::intruder::DetectionOutcome;

/// JSON body of a completed check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DetectionResponse {
    /// Human readable verdict
    #[schema(example = "Unknown Person Detected")]
    pub message: String,
    /// URL of the stored upload, present only for unknown persons
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<DetectionOutcome> for DetectionResponse {
    fn from(outcome: DetectionOutcome) -> Self {
        match outcome {
            DetectionOutcome::NoPerson => Self {
                message: "No person detected".to_string(),
                image_url: None,
            },
            DetectionOutcome::KnownPerson { person_name } => Self {
                message: format!("Intruder Detected: {person_name}"),
                image_url: None,
            },
            DetectionOutcome::UnknownPerson { image_url } => Self {
                message: "Unknown Person Detected".to_string(),
                image_url: Some(image_url),
            },
        }
    }
}
