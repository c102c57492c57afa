//! Database repositories
//!
//! Each repository owns a clone of the pool and maps rows into `gallery_core` models.

pub mod comment;
pub mod media_item;

pub use comment::CommentRepository;
pub use media_item::{MediaItemRepository, PhotoListing};
