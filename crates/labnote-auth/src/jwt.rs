//! JWT (JSON Web Token) handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Issuer stamped on session tokens
pub const SESSION_ISSUER: &str = "labnote";
/// Audience stamped on session tokens
pub const SESSION_AUDIENCE: &str = "labnote-api";

/// JWT claims for an authenticated user session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JwtClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
    /// Custom: team the session is currently working in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Custom: "session" or "api"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl JwtClaims {
    pub fn new(user_id: Uuid, issuer: String, audience: String, validity: Duration) -> Self {
        let now = Utc::now();
        let exp = now + validity;

        Self {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: issuer,
            aud: audience,
            team_id: None,
            token_type: None,
        }
    }

    pub fn with_team_id(mut self, team_id: Uuid) -> Self {
        self.team_id = Some(team_id.to_string());
        self
    }

    pub fn with_token_type(mut self, token_type: impl Into<String>) -> Self {
        self.token_type = Some(token_type.into());
        self
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }

    /// Parse the subject as a user ID.
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }

    /// Parse the current team claim, if present.
    pub fn current_team(&self) -> Result<Option<Uuid>, JwtError> {
        self.team_id
            .as_deref()
            .map(|id| Uuid::parse_str(id).map_err(|_| JwtError::InvalidToken))
            .transpose()
    }
}

/// JWT errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT encoding error: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// JWT validator
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    /// Create a new JWT validator using HMAC-SHA256 (symmetric secret)
    ///
    /// Validates signature and expiration. Issuer and audience are only
    /// checked when configured with `with_issuer` / `with_audience`.
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_aud = false;
        validation.validate_nbf = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn with_audience(mut self, audience: String) -> Self {
        self.validation.set_audience(&[audience]);
        self.validation.validate_aud = true;
        self
    }

    /// Validator for session tokens minted by this service.
    pub fn for_sessions(secret: &[u8]) -> Self {
        Self::new(secret)
            .with_issuer(SESSION_ISSUER.to_string())
            .with_audience(SESSION_AUDIENCE.to_string())
    }

    pub fn with_issuer(mut self, issuer: String) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, JwtError> {
        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::EncodingError(e),
            })?;

        if token_data.claims.is_expired() {
            return Err(JwtError::TokenExpired);
        }

        Ok(token_data.claims)
    }

    /// Encode JWT using HMAC-SHA256 (symmetric secret)
    pub fn encode(secret: &[u8], claims: &JwtClaims) -> Result<String, JwtError> {
        let header = Header::new(Algorithm::HS256);
        let encoding_key = EncodingKey::from_secret(secret);

        Ok(encode(&header, claims, &encoding_key)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test_secret_key_1234567890";

    fn claims(validity: Duration) -> JwtClaims {
        JwtClaims::new(
            Uuid::new_v4(),
            SESSION_ISSUER.to_string(),
            SESSION_AUDIENCE.to_string(),
            validity,
        )
    }

    #[test]
    fn test_jwt_encode_decode() {
        let claims = claims(Duration::hours(1));

        let token = JwtValidator::encode(TEST_SECRET, &claims).unwrap();

        let validator = JwtValidator::for_sessions(TEST_SECRET);

        let decoded = validator.validate(&token).unwrap();

        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.iss, claims.iss);
        assert_eq!(decoded.aud, claims.aud);
        assert_eq!(decoded.user_id().unwrap(), claims.user_id().unwrap());
    }

    #[test]
    fn test_current_team_survives_round_trip() {
        let team = Uuid::new_v4();
        let claims = claims(Duration::hours(1))
            .with_team_id(team)
            .with_token_type("session");

        let token = JwtValidator::encode(TEST_SECRET, &claims).unwrap();
        let decoded = JwtValidator::new(TEST_SECRET).validate(&token).unwrap();

        assert_eq!(decoded.current_team().unwrap(), Some(team));
        assert_eq!(decoded.token_type.as_deref(), Some("session"));
    }

    #[test]
    fn test_expired_token() {
        let claims = claims(Duration::hours(-1));
        assert!(claims.is_expired());

        let token = JwtValidator::encode(TEST_SECRET, &claims).unwrap();
        let result = JwtValidator::new(TEST_SECRET).validate(&token);

        assert!(matches!(result, Err(JwtError::TokenExpired)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtValidator::encode(TEST_SECRET, &claims(Duration::hours(1))).unwrap();
        let result = JwtValidator::new(b"another_secret_entirely").validate(&token);

        assert!(matches!(result, Err(JwtError::EncodingError(_))));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let token = JwtValidator::encode(TEST_SECRET, &claims(Duration::hours(1))).unwrap();
        let validator = JwtValidator::new(TEST_SECRET).with_audience("elsewhere".to_string());

        let result = validator.validate(&token);

        assert!(matches!(result, Err(JwtError::EncodingError(ref e))
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::InvalidAudience)));
    }

    #[test]
    fn test_session_validator_rejects_foreign_issuer() {
        let mut foreign = claims(Duration::hours(1));
        foreign.iss = "someone-else".to_string();
        let token = JwtValidator::encode(TEST_SECRET, &foreign).unwrap();

        let result = JwtValidator::for_sessions(TEST_SECRET).validate(&token);

        assert!(matches!(result, Err(JwtError::EncodingError(ref e))
            if matches!(e.kind(), jsonwebtoken::errors::ErrorKind::InvalidIssuer)));
    }

    #[test]
    fn test_session_validator_rejects_foreign_audience() {
        let mut foreign = claims(Duration::hours(1));
        foreign.aud = "another-api".to_string();
        let token = JwtValidator::encode(TEST_SECRET, &foreign).unwrap();

        assert!(JwtValidator::for_sessions(TEST_SECRET)
            .validate(&token)
            .is_err());
    }

    #[test]
    fn test_malformed_subject() {
        let mut claims = claims(Duration::hours(1));
        claims.sub = "not-a-uuid".to_string();
        claims.team_id = Some("nope".to_string());

        assert!(matches!(claims.user_id(), Err(JwtError::InvalidToken)));
        assert!(matches!(claims.current_team(), Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_optional_claims_skipped_when_none() {
        let json = serde_json::to_string(&claims(Duration::hours(1))).unwrap();

        assert!(!json.contains("team_id"));
        assert!(!json.contains("token_type"));
    }
}
