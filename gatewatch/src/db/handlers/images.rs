//! Database repository for known identities.

use sqlx::PgConnection;
use tracing::instrument;

use crate::db::{
    errors::Result,
    models::images::{ImageRecord, ImageRecordCreateRequest},
};

const COLUMNS: &str = "id, image_url, person_name, created_at";

pub struct Images<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Images<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// First record for `image_url`, oldest first.
    #[instrument(skip(self), err)]
    pub async fn find_by_image_url(&mut self, image_url: &str) -> Result<Option<ImageRecord>> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            "SELECT {COLUMNS} FROM images WHERE image_url = $1 ORDER BY created_at ASC, id ASC LIMIT 1"
        ))
        .bind(image_url)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(record)
    }

    /// Record a known identity. The request path never writes; this is for seeding.
    #[instrument(skip(self, request), fields(person_name = %request.person_name), err)]
    pub async fn create(&mut self, request: &ImageRecordCreateRequest) -> Result<ImageRecord> {
        let record = sqlx::query_as::<_, ImageRecord>(&format!(
            "INSERT INTO images (image_url, person_name) VALUES ($1, $2) RETURNING {COLUMNS}"
        ))
        .bind(&request.image_url)
        .bind(&request.person_name)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(record)
    }
}
