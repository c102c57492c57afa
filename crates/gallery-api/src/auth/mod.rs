//! Bearer-token authentication against the external identity provider

pub mod jwt;
pub mod models;

pub use jwt::JwtService;
pub use models::{AdminUser, AuthUser, JwtClaims, UserRole};
