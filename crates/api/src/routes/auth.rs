//! Login endpoint.

use axum::{extract::State, Json};
use domain::models::{LoginRequest, LoginResponse};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::services::{AuthError, AuthService};

/// Exchange credentials for a session token.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let service = AuthService::new(state.pool.clone(), state.jwt.clone());
    let response = service
        .login(&request.email, &request.password)
        .await
        .map_err(|e| match e {
            // Unknown email and wrong password look the same to the caller.
            AuthError::UserNotFound | AuthError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid credentials".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        })?;

    Ok(Json(response))
}
