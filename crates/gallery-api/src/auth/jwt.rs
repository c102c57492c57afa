//! HS256 JWT validation
//!
//! Tokens are issued by the external identity provider and signed with a secret shared
//! with this service. Only validation happens here; nothing in the gallery issues tokens.

use crate::auth::models::{AuthUser, JwtClaims, UserRole};
use gallery_core::AppError;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};

/// Validates bearer tokens and turns their claims into an `AuthUser`
#[derive(Clone)]
pub struct JwtService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let token_data =
            decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                tracing::debug!("JWT validation failed: {}", e);
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthorized("Token has expired".to_string())
                    }
                    ErrorKind::InvalidIssuer => {
                        AppError::Unauthorized("Invalid token issuer".to_string())
                    }
                    ErrorKind::ImmatureSignature => {
                        AppError::Unauthorized("Token is not yet valid (nbf)".to_string())
                    }
                    _ => AppError::Unauthorized(format!("Invalid or expired token: {}", e)),
                }
            })?;

        Ok(token_data.claims)
    }

    /// Validate `token` and build the caller's identity from its claims.
    pub fn authenticate(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = self.validate_token(token)?;
        let roles = claims
            .roles
            .iter()
            .filter_map(|role| role.parse::<UserRole>().ok())
            .collect();

        Ok(AuthUser {
            user_name: claims.name.unwrap_or_else(|| claims.sub.clone()),
            user_id: claims.sub,
            roles,
        })
    }
}
