//! Session token authentication middleware.
//!
//! First gate on every protected route: a valid Bearer token or 401.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::jwt::{Claims, JwtConfig, JwtError};

use crate::app::AppState;

/// Identity decoded from a validated session token.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the token subject.
    pub user_id: i64,
    /// Role claim exactly as issued.
    pub role: String,
    pub claims: Claims,
}

impl UserAuth {
    /// Validates a session token and returns the identity it carries.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt_config.validate_token(token)?;
        let user_id = claims.user_id()?;

        Ok(UserAuth {
            user_id,
            role: claims.role.clone(),
            claims,
        })
    }
}

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Middleware that requires a valid session token.
///
/// On success the decoded [`UserAuth`] is stored in request extensions.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(req.headers()) else {
        return unauthorized_response("No token provided");
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(JwtError::TokenExpired) => unauthorized_response("Token expired"),
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            unauthorized_response("Invalid token")
        }
    }
}

/// Helper to create unauthorized response.
pub(crate) fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
