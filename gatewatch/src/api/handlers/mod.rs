//! HTTP request handlers.
//!
//! - [`detect`]: image upload and intruder check
//! - [`health`]: liveness probe
//!
//! Handlers return [`crate::errors::Error`], which renders the plain-text 400/500 bodies.

pub mod detect;
pub mod health;
