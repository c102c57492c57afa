use gallery_api::auth::JwtClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Shared secret the test server validates tokens with.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";

/// Bearer token as the identity provider would issue it.
pub fn token_with_roles(user_id: &str, name: &str, roles: &[&str]) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_secs() as i64;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        name: Some(name.to_string()),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: now + 3600,
        iat: Some(now),
        iss: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign test token")
}

pub fn admin_token() -> String {
    token_with_roles("admin-1", "Ada Admin", &["Admin"])
}

pub fn user_token() -> String {
    token_with_roles("user-1", "Uma User", &["User"])
}
