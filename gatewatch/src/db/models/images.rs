//! Database models for known identities.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored image URL mapped to the person it shows
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub image_url: String,
    pub person_name: String,
    pub created_at: DateTime<Utc>,
}

/// Request for recording a known identity
#[derive(Debug, Clone)]
pub struct ImageRecordCreateRequest {
    pub image_url: String,
    pub person_name: String,
}
