//! Gallery Database Layer
//!
//! Postgres repositories for media items and comments. The schema lives in the
//! workspace `migrations/` directory and is embedded into this crate.

pub mod db;

pub use db::{CommentRepository, MediaItemRepository, PhotoListing};

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");
