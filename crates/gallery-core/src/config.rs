//! Configuration module
//!
//! Gallery settings are read from the environment (a `.env` file is honoured through
//! dotenvy) into a `GalleryConfig`, exposed to the rest of the service through the
//! `Config` newtype and its getters.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 4000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_CONCURRENT_REQUESTS: usize = 256;
const MAX_FILE_SIZE_MB: usize = 10;
const MAX_VIDEO_SIZE_MB: usize = 500;
const FRONT_PAGE_SIZE: i64 = 5;
const FEATURED_PHOTO_COUNT: i64 = 5;

/// Settings shared by every HTTP-facing service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub max_concurrent_requests: usize,
    /// HS256 secret shared with the external identity provider
    pub jwt_secret: String,
    /// Expected `iss` claim, if the identity provider sets one
    pub jwt_issuer: Option<String>,
    pub environment: String,
}

/// Gallery service configuration
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO etc.)
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_storage_path: Option<String>,
    // Upload validation
    pub max_file_size_bytes: usize,
    pub allowed_extensions: Vec<String>,
    pub allowed_content_types: Vec<String>,
    pub max_video_size_bytes: usize,
    pub video_allowed_extensions: Vec<String>,
    pub video_allowed_content_types: Vec<String>,
    // Listings
    pub front_page_size: i64,
    pub featured_photo_count: i64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<GalleryConfig>);

impl Config {
    fn as_gallery(&self) -> &GalleryConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_gallery().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = GalleryConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_gallery().validate()
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.as_gallery().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_gallery().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_gallery().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_gallery().base.db_timeout_seconds
    }

    pub fn max_concurrent_requests(&self) -> usize {
        self.as_gallery().base.max_concurrent_requests
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_gallery().base.jwt_secret
    }

    pub fn jwt_issuer(&self) -> Option<&str> {
        self.as_gallery().base.jwt_issuer.as_deref()
    }

    pub fn environment(&self) -> &str {
        &self.as_gallery().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.as_gallery().database_url
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_gallery().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_gallery().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_gallery().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_gallery().s3_endpoint.as_deref()
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_gallery().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_gallery().aws_secret_access_key.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_gallery().local_storage_path.as_deref()
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.as_gallery().max_file_size_bytes
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.as_gallery().allowed_extensions
    }

    pub fn allowed_content_types(&self) -> &[String] {
        &self.as_gallery().allowed_content_types
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_gallery().max_video_size_bytes
    }

    pub fn video_allowed_extensions(&self) -> &[String] {
        &self.as_gallery().video_allowed_extensions
    }

    pub fn video_allowed_content_types(&self) -> &[String] {
        &self.as_gallery().video_allowed_content_types
    }

    pub fn front_page_size(&self) -> i64 {
        self.as_gallery().front_page_size
    }

    pub fn featured_photo_count(&self) -> i64 {
        self.as_gallery().featured_photo_count
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn parse_list(raw: String) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl GalleryConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_vars<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins_str = var("CORS_ORIGINS").unwrap_or_else(|| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: match var("PORT") {
                Some(port) => port
                    .parse()
                    .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
                None => SERVER_PORT,
            },
            cors_origins,
            db_max_connections: var("DB_MAX_CONNECTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: var("DB_TIMEOUT_SECONDS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            max_concurrent_requests: var("MAX_CONCURRENT_REQUESTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(MAX_CONCURRENT_REQUESTS),
            jwt_secret: var("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            jwt_issuer: var("JWT_ISSUER"),
            environment,
        };

        let storage_backend = match var("STORAGE_BACKEND") {
            Some(raw) => Some(raw.parse::<StorageBackend>()?),
            None => None,
        };

        let max_file_size_mb = var("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);
        let max_video_size_mb = var("MAX_VIDEO_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        Ok(GalleryConfig {
            base,
            database_url: var("DATABASE_URL")
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL must be set"))?,
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION").or_else(|| var("AWS_REGION")),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_access_key_id: var("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            allowed_extensions: parse_list(
                var("ALLOWED_EXTENSIONS").unwrap_or_else(|| "jpg,jpeg,png,gif,webp".to_string()),
            ),
            allowed_content_types: parse_list(var("ALLOWED_CONTENT_TYPES").unwrap_or_else(
                || "image/jpeg,image/png,image/gif,image/webp".to_string(),
            )),
            max_video_size_bytes: max_video_size_mb * 1024 * 1024,
            video_allowed_extensions: parse_list(
                var("VIDEO_ALLOWED_EXTENSIONS").unwrap_or_else(|| "mp4,mov,webm".to_string()),
            ),
            video_allowed_content_types: parse_list(var("VIDEO_ALLOWED_CONTENT_TYPES").unwrap_or_else(
                || "video/mp4,video/quicktime,video/webm".to_string(),
            )),
            front_page_size: var("FRONT_PAGE_SIZE")
                .and_then(|s| s.parse().ok())
                .filter(|size: &i64| *size > 0)
                .unwrap_or(FRONT_PAGE_SIZE),
            featured_photo_count: var("FEATURED_PHOTO_COUNT")
                .and_then(|s| s.parse().ok())
                .filter(|count: &i64| *count >= 0)
                .unwrap_or(FEATURED_PHOTO_COUNT),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgresql://")
            || self.database_url.starts_with("postgres://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        match self.storage_backend.unwrap_or(StorageBackend::Local) {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
            }
        }

        Ok(())
    }
}
