//! Database record structures matching table schemas.

pub mod images;
