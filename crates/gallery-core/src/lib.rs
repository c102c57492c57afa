//! Gallery Core Library
//!
//! This crate provides the domain models, error types, configuration, and the two
//! pieces of gallery logic that every other crate builds on: the pager used by listing
//! endpoints and the folder path resolver used to locate stored media files.

pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod path;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, GalleryConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use pagination::{get_paged, page_window, PageSource, PageWindow, PagedResult};
pub use path::{Breadcrumb, FolderNode, FolderTree, PageContext, MAX_FOLDER_DEPTH};
pub use storage_types::StorageBackend;
