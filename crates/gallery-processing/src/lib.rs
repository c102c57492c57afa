//! Gallery Processing Library
//!
//! Upload validation, EXIF location extraction, and the named effects that can be
//! applied to a photo when it is served.

#[cfg(feature = "image")]
pub mod effects;
#[cfg(feature = "image")]
pub mod gps;
pub mod validator;

#[cfg(feature = "image")]
pub use effects::{render_with_effect, render_with_effect_blocking, ImageEffect, RenderedImage};
#[cfg(feature = "image")]
pub use gps::extract_gps;
pub use validator::{
    content_type_for, sanitize_file_name, MediaValidator, UploadValidator, ValidationError,
};
