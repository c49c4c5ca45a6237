//! HTTP surface.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Response bodies
//!
//! OpenAPI documentation is generated with `utoipa` and served at `/docs`.

pub mod handlers;
pub mod models;
