use gallery_core::models::MediaKind;
use gallery_core::AppError;
use std::path::Path;

/// Common validation errors for uploaded files
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid file extension: {extension} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid content type: {content_type} (allowed: {allowed:?})")]
    InvalidContentType {
        content_type: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            too_large @ ValidationError::FileTooLarge { .. } => {
                AppError::PayloadTooLarge(too_large.to_string())
            }
            other => AppError::InvalidInput(other.to_string()),
        }
    }
}

fn extension_of(filename: &str) -> Result<String, ValidationError> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))
}

fn content_types_for_extension(extension: &str) -> Option<&'static [&'static str]> {
    let types: &'static [&'static str] = match extension {
        "jpg" | "jpeg" => &["image/jpeg"],
        "png" => &["image/png"],
        "gif" => &["image/gif"],
        "webp" => &["image/webp"],
        "bmp" => &["image/bmp"],
        "mp4" => &["video/mp4"],
        "webm" => &["video/webm"],
        "mov" => &["video/quicktime"],
        "avi" => &["video/x-msvideo"],
        "mkv" => &["video/x-matroska"],
        "m4v" => &["video/x-m4v"],
        _ => return None,
    };
    Some(types)
}

/// Content-Type to serve a stored file with, judged by its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    extension_of(file_name)
        .ok()
        .and_then(|ext| content_types_for_extension(&ext))
        .and_then(|types| types.first().copied())
        .unwrap_or("application/octet-stream")
}

/// Strip any client-side directory from an uploaded file name.
///
/// Browsers may send a full path (`C:\Users\me\img.jpg`); only the last segment is kept.
pub fn sanitize_file_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    if name.is_empty() || name == "." || name == ".." || name.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFilename(raw.to_string()));
    }

    Ok(name.to_string())
}

/// Validator for one family of files (photos or videos)
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
    allowed_content_types: Vec<String>,
}

impl MediaValidator {
    pub fn new(
        max_file_size: usize,
        allowed_extensions: Vec<String>,
        allowed_content_types: Vec<String>,
    ) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
            allowed_content_types,
        }
    }

    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let normalized = content_type.to_lowercase();
        self.allowed_content_types.iter().any(|ct| ct == &normalized)
    }

    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    pub fn validate_extension(&self, filename: &str) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_content_type(&self, content_type: &str) -> Result<(), ValidationError> {
        if !self.accepts_content_type(content_type) {
            return Err(ValidationError::InvalidContentType {
                content_type: content_type.to_string(),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    /// Reject files whose extension disagrees with the declared Content-Type.
    pub fn validate_extension_content_type_match(
        &self,
        filename: &str,
        content_type: &str,
    ) -> Result<(), ValidationError> {
        let extension = extension_of(filename)?;
        let normalized_content_type = content_type.to_lowercase();

        let Some(expected_content_types) = content_types_for_extension(&extension) else {
            tracing::debug!(
                extension = %extension,
                content_type = %content_type,
                "Unknown extension, skipping Content-Type/extension cross-validation"
            );
            return Ok(());
        };

        if !expected_content_types
            .iter()
            .any(|ct| *ct == normalized_content_type)
        {
            return Err(ValidationError::InvalidContentType {
                content_type: format!(
                    "{} (does not match extension '{}'. Expected one of: {})",
                    content_type,
                    extension,
                    expected_content_types.join(", ")
                ),
                allowed: self.allowed_content_types.clone(),
            });
        }

        Ok(())
    }

    pub fn validate_all(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<(), ValidationError> {
        self.validate_file_size(file_size)?;
        self.validate_extension(filename)?;
        self.validate_content_type(content_type)?;
        self.validate_extension_content_type_match(filename, content_type)?;
        Ok(())
    }
}

/// Routes an upload to the photo or video validator by its Content-Type.
pub struct UploadValidator {
    photo: MediaValidator,
    video: MediaValidator,
}

impl UploadValidator {
    pub fn new(photo: MediaValidator, video: MediaValidator) -> Self {
        Self { photo, video }
    }

    pub fn from_config(config: &gallery_core::Config) -> Self {
        Self::new(
            MediaValidator::new(
                config.max_file_size_bytes(),
                config.allowed_extensions().to_vec(),
                config.allowed_content_types().to_vec(),
            ),
            MediaValidator::new(
                config.max_video_size_bytes(),
                config.video_allowed_extensions().to_vec(),
                config.video_allowed_content_types().to_vec(),
            ),
        )
    }

    /// Kind of item an upload becomes; anything that is not a video is treated as a photo.
    pub fn classify(&self, content_type: &str) -> MediaKind {
        if content_type.to_lowercase().starts_with("video/")
            || self.video.accepts_content_type(content_type)
        {
            MediaKind::Video
        } else {
            MediaKind::Photo
        }
    }

    /// Validate one uploaded file and report what kind of item it becomes.
    pub fn validate(
        &self,
        filename: &str,
        content_type: &str,
        file_size: usize,
    ) -> Result<MediaKind, ValidationError> {
        let kind = self.classify(content_type);
        let validator = match kind {
            MediaKind::Video => &self.video,
            _ => &self.photo,
        };
        validator.validate_all(filename, content_type, file_size)?;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::ErrorMetadata;

    fn photo_validator() -> MediaValidator {
        MediaValidator::new(
            1024 * 1024, // 1MB
            vec!["jpg".to_string(), "png".to_string()],
            vec!["image/jpeg".to_string(), "image/png".to_string()],
        )
    }

    fn upload_validator() -> UploadValidator {
        UploadValidator::new(
            photo_validator(),
            MediaValidator::new(
                10 * 1024 * 1024,
                vec!["mp4".to_string(), "webm".to_string()],
                vec!["video/mp4".to_string(), "video/webm".to_string()],
            ),
        )
    }

    #[test]
    fn test_validate_file_size() {
        let validator = photo_validator();
        assert!(validator.validate_file_size(512 * 1024).is_ok());
        assert!(matches!(
            validator.validate_file_size(2 * 1024 * 1024),
            Err(ValidationError::FileTooLarge { .. })
        ));
        assert!(matches!(
            validator.validate_file_size(0),
            Err(ValidationError::EmptyFile)
        ));
    }

    #[test]
    fn test_validate_extension() {
        let validator = photo_validator();
        assert!(validator.validate_extension("test.jpg").is_ok());
        assert!(validator.validate_extension("test.PNG").is_ok());
        assert!(validator.validate_extension("test.gif").is_err());
        assert!(validator.validate_extension("noextension").is_err());
    }

    #[test]
    fn test_validate_content_type_is_case_insensitive() {
        let validator = photo_validator();
        assert!(validator.validate_content_type("IMAGE/PNG").is_ok());
        assert!(validator.validate_content_type("image/gif").is_err());
    }

    #[test]
    fn test_extension_content_type_mismatch() {
        let validator = photo_validator();
        assert!(validator
            .validate_extension_content_type_match("test.jpeg", "image/jpeg")
            .is_ok());
        assert!(validator
            .validate_extension_content_type_match("test.jpg", "image/png")
            .is_err());
        assert!(validator
            .validate_extension_content_type_match("test.xyz", "application/xyz")
            .is_ok());
    }

    #[test]
    fn test_upload_validator_classifies_by_content_type() {
        let validator = upload_validator();
        assert_eq!(
            validator.validate("clip.mp4", "video/mp4", 5 * 1024 * 1024).unwrap(),
            MediaKind::Video
        );
        assert_eq!(
            validator.validate("photo.jpg", "image/jpeg", 1024).unwrap(),
            MediaKind::Photo
        );
        // A 5MB photo exceeds the photo limit even though videos may be larger
        assert!(validator
            .validate("photo.jpg", "image/jpeg", 5 * 1024 * 1024)
            .is_err());
        assert_eq!(validator.classify("video/x-flv"), MediaKind::Video);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("img.jpg").unwrap(), "img.jpg");
        assert_eq!(
            sanitize_file_name(r"C:\Users\me\Pictures\img.jpg").unwrap(),
            "img.jpg"
        );
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert!(sanitize_file_name("photos/").is_err());
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name("bad\u{0}.jpg").is_err());
    }

    #[test]
    fn test_content_type_for_stored_files() {
        assert_eq!(content_type_for("img.JPG"), "image/jpeg");
        assert_eq!(content_type_for("folder.jpg"), "image/jpeg");
        assert_eq!(content_type_for("clip.mov"), "video/quicktime");
        assert_eq!(content_type_for("notes.txt"), "application/octet-stream");
        assert_eq!(content_type_for("README"), "application/octet-stream");
    }

    #[test]
    fn test_validation_error_to_app_error() {
        let err: AppError = ValidationError::FileTooLarge { size: 2, max: 1 }.into();
        assert_eq!(err.http_status_code(), 413);

        let err: AppError = ValidationError::EmptyFile.into();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
