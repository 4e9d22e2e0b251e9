//! JWT Authentication Middleware
//!
//! Extracts the session token from the `session_token` cookie or the
//! `Authorization: Bearer` header, validates it and makes the caller available
//! to handlers via Axum's Extension.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use labnote_auth::JwtValidator;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::models::ErrorResponse;

/// Authenticated caller extracted from the session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: Uuid,
    /// Team the session is currently working in
    pub current_team: Option<Uuid>,
}

/// JWT validation state shared across middleware instances
#[derive(Clone)]
pub struct JwtState {
    pub validator: Arc<JwtValidator>,
}

impl JwtState {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            validator: Arc::new(JwtValidator::for_sessions(secret)),
        }
    }
}

fn unauthorized(error: impl Into<String>, code: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: error.into(),
            code: Some(code.to_string()),
        }),
    )
}

/// Authentication middleware for session tokens
///
/// # Errors
/// Returns 401 Unauthorized if:
/// - Both cookie and Authorization header are missing
/// - Token is malformed, invalid or expired
/// - Token type is not "session"
/// - Subject or team claim is not a UUID
pub async fn require_auth(
    state: axum::extract::State<Arc<JwtState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // Cookie first (web app), then Authorization header (API clients)
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .map(|c| c.trim())
                .find_map(|c| c.strip_prefix("session_token="))
        })
        .map(str::to_string);

    let token = match token {
        Some(t) => t,
        None => {
            let auth_header = request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| {
                    unauthorized(
                        "Missing authentication token (cookie or Authorization header)",
                        "MISSING_AUTH",
                    )
                })?;

            auth_header
                .strip_prefix("Bearer ")
                .ok_or_else(|| {
                    unauthorized(
                        "Invalid Authorization header format. Expected 'Bearer <token>'",
                        "INVALID_AUTH_FORMAT",
                    )
                })?
                .to_string()
        }
    };

    let claims = state
        .validator
        .validate(&token)
        .map_err(|e| unauthorized(format!("Invalid or expired token: {}", e), "INVALID_TOKEN"))?;

    match claims.token_type.as_deref() {
        Some("session") => {}
        Some(other) => {
            return Err(unauthorized(
                format!(
                    "Invalid token type '{}'. Expected 'session' token for API access",
                    other
                ),
                "INVALID_TOKEN_TYPE",
            ));
        }
        None => {
            return Err(unauthorized(
                "Token missing 'token_type' claim",
                "MISSING_TOKEN_TYPE",
            ));
        }
    }

    let user_id = claims
        .user_id()
        .map_err(|_| unauthorized("Token subject is not a user ID", "INVALID_SUBJECT"))?;
    let current_team = claims
        .current_team()
        .map_err(|_| unauthorized("Token team claim is not a team ID", "INVALID_TEAM"))?;

    request.extensions_mut().insert(AuthUser {
        user_id,
        current_team,
    });

    Ok(next.run(request).await)
}
