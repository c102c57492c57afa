//! Data models for the gallery
//!
//! Every browsable entity is a `MediaItem`: a folder, a photo or a video. Folders own
//! child items; photos and videos carry a stored file name and an optional location.

mod comment;
mod folder;
mod item;
mod photo;

pub use comment::*;
pub use folder::*;
pub use item::*;
pub use photo::*;
