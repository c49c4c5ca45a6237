use crate::db::errors::DbError;
use crate::detection::DetectionError;
use crate::storage::StorageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error as ThisError;

/// Body returned for every dependency failure. Callers never see which collaborator failed.
pub const PROCESSING_ERROR_MESSAGE: &str = "Error processing image";

/// Body returned when the request carries no image.
pub const MISSING_IMAGE_MESSAGE: &str = "No image uploaded";

#[derive(ThisError, Debug)]
pub enum Error {
    /// The multipart body had no usable `image` file field
    #[error("No image uploaded")]
    MissingInput,

    /// The request body could not be read as multipart form data
    #[error("{message}")]
    BadRequest { message: String },

    /// Object storage upload failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Label detection failed
    #[error(transparent)]
    Detection(#[from] DetectionError),

    /// Identity record lookup failed
    #[error(transparent)]
    Database(#[from] DbError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingInput | Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Storage(_) | Error::Detection(_) | Error::Database(_) | Error::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::MissingInput => MISSING_IMAGE_MESSAGE.to_string(),
            Error::BadRequest { message } => message.clone(),
            _ => PROCESSING_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::MissingInput | Error::BadRequest { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Storage(_) => {
                tracing::error!("Image upload failed: {:#}", self);
            }
            Error::Detection(_) => {
                tracing::error!("Label detection failed: {:#}", self);
            }
            Error::Database(_) => {
                tracing::error!("Identity record lookup failed: {:#}", self);
            }
            Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
        }

        (self.status_code(), self.user_message()).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
