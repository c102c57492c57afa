//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use gallery_core::Config;

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    if config.db_max_connections() == 0 {
        return Err(anyhow::anyhow!("Database max connections cannot be 0"));
    }

    if config.db_timeout_seconds() == 0 {
        return Err(anyhow::anyhow!("Database timeout cannot be 0"));
    }

    if config.max_concurrent_requests() == 0 {
        return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS cannot be 0"));
    }

    if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_core::GalleryConfig;

    fn config_with(extra: &'static [(&'static str, &'static str)]) -> Config {
        let gallery = GalleryConfig::from_vars(|key| {
            extra
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .or_else(|| match key {
                    "JWT_SECRET" => Some("0123456789abcdef0123456789abcdef".to_string()),
                    "DATABASE_URL" => Some("postgresql://localhost/gallery".to_string()),
                    "LOCAL_STORAGE_PATH" => Some("/tmp/gallery".to_string()),
                    _ => None,
                })
        })
        .unwrap();
        Config(Box::new(gallery))
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&config_with(&[])).is_ok());
    }

    #[test]
    fn test_zero_pool_size_is_rejected() {
        assert!(validate_config(&config_with(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
    }

    #[test]
    fn test_short_jwt_secret_is_rejected() {
        assert!(validate_config(&config_with(&[("JWT_SECRET", "too-short")])).is_err());
    }
}
