//! Repository implementations for database access.
//!
//! Each repository wraps a SQLx connection (or transaction) and returns models from
//! [`crate::db::models`]:
//!
//! ```ignore
//! use gatewatch::db::handlers::Images;
//!
//! async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut conn = pool.acquire().await?;
//!     let mut repo = Images::new(&mut conn);
//!
//!     if let Some(record) = repo.find_by_image_url("https://...").await? {
//!         println!("Known person: {}", record.person_name);
//!     }
//!     Ok(())
//! }
//! ```

pub mod images;

pub use images::Images;
