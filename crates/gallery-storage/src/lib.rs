//! Gallery Storage Library
//!
//! Storage abstraction for media bytes, with local filesystem and S3 backends.
//!
//! # Storage key format
//!
//! Keys are the relative paths produced by `gallery_core::FolderTree::resolve_path`:
//! the ancestor folder ids of the item joined root first, then the file name
//! (`1/2/3/img.jpg`), or the bare file name for root-level items. The folder
//! thumbnail lives at the root as `folder.jpg`.
//!
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use gallery_core::StorageBackend;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{ByteStream, Storage, StorageError, StorageResult};
