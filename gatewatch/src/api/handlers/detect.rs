use axum::{
    Json,
    extract::{Multipart, State, multipart::MultipartRejection},
};
use tracing::instrument;

use crate::AppState;
use crate::api::models::detection::DetectionResponse;
use crate::errors::{Error, Result};
use crate::intruder::ImageUpload;

/// Multipart field carrying the image.
pub const IMAGE_FIELD: &str = "image";

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[utoipa::path(
    post,
    path = "/detect-intruder",
    tag = "detection",
    summary = "Check an image for intruders",
    description = "Stores the uploaded image, runs label detection on it and, if a person is present, \
                   matches the stored image URL against known identities.",
    request_body(
        content_type = "multipart/form-data",
        description = "Form with a single file field named `image`"
    ),
    responses(
        (status = 200, description = "Check completed", body = DetectionResponse),
        (status = 400, description = "No image uploaded", body = String),
        (status = 500, description = "Error processing image", body = String)
    )
)]
#[instrument(skip_all)]
pub async fn detect_intruder(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>> {
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Request is not multipart: {}", e);
        Error::MissingInput
    })?;

    let upload = read_image_field(&mut multipart).await?.ok_or(Error::MissingInput)?;

    let outcome = state.detection.check(upload).await?;

    Ok(Json(outcome.into()))
}

/// Read the first `image` file into memory. Other fields, and plain text parts named `image`,
/// are skipped. An empty file counts as no file.
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ImageUpload>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {}", e),
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            tracing::debug!("Skipping `image` part without a file name");
            continue;
        };
        let content_type = field.content_type().unwrap_or(DEFAULT_CONTENT_TYPE).to_string();

        let content = field.bytes().await.map_err(|e| Error::BadRequest {
            message: format!("Failed to read image: {}", e),
        })?;

        tracing::debug!(file_name = %file_name, content_type = %content_type, size = content.len(), "Received image");

        if content.is_empty() {
            return Ok(None);
        }

        return Ok(Some(ImageUpload {
            content,
            file_name,
            content_type,
        }));
    }

    Ok(None)
}
