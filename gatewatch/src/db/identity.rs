use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::{errors::Result, handlers::Images, models::images::ImageRecord};

/// Read access to the image URL -> person name mapping.
#[async_trait]
pub trait IdentityRecords: Send + Sync {
    async fn find_by_image_url(&self, image_url: &str) -> Result<Option<ImageRecord>>;
}

/// [`IdentityRecords`] backed by the `images` table.
#[derive(Clone)]
pub struct PgIdentityRecords {
    pool: PgPool,
}

impl PgIdentityRecords {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdentityRecords for PgIdentityRecords {
    async fn find_by_image_url(&self, image_url: &str) -> Result<Option<ImageRecord>> {
        let mut conn = self.pool.acquire().await?;
        Images::new(&mut conn).find_by_image_url(image_url).await
    }
}
