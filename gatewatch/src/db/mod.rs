//! Identity record persistence (PostgreSQL via SQLx).
//!
//! The request path only ever reads from this layer, through the [`IdentityRecords`] trait.
//! [`handlers::Images`] is the repository over the `images` table; [`PgIdentityRecords`] adapts
//! it to the trait using a connection pool.

pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;

pub use identity::{IdentityRecords, PgIdentityRecords};
