//! Session tokens for the lab notebook API

pub mod jwt;

pub use jwt::{JwtClaims, JwtError, JwtValidator, SESSION_AUDIENCE, SESSION_ISSUER};

// Re-export useful types
pub use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Validation};
