//! Admin user management endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{CreateUserRequest, UpdateUserRequest, UserSummary};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentActor, JsonBody};
use crate::routes::me::MessageResponse;
use crate::routes::parse_id;
use crate::services::{UserAdminError, UserAdminService};

fn map_error(err: UserAdminError) -> ApiError {
    match err {
        UserAdminError::EmailTaken => ApiError::Conflict("Email already exists".to_string()),
        UserAdminError::SelfDelete => {
            ApiError::Validation("Cannot delete your own account".to_string())
        }
        UserAdminError::InvalidRole => {
            ApiError::Validation("Role must be 'admin' or 'user'".to_string())
        }
        UserAdminError::NotFound => ApiError::NotFound("User not found".to_string()),
        other => ApiError::Internal(other.to_string()),
    }
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = UserAdminService::new(state.pool.clone())
        .list()
        .await
        .map_err(map_error)?;
    Ok(Json(users))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    request.validate()?;

    UserAdminService::new(state.pool.clone())
        .create(&request)
        .await
        .map_err(map_error)?;

    Ok(Json(MessageResponse::new("User created")))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    JsonBody(request): JsonBody<UpdateUserRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id, "Invalid id")?;
    request.validate()?;

    UserAdminService::new(state.pool.clone())
        .update(id, &request)
        .await
        .map_err(map_error)?;

    Ok(Json(MessageResponse::new("User updated")))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id, "Invalid id")?;

    UserAdminService::new(state.pool.clone())
        .delete(&actor, id)
        .await
        .map_err(map_error)?;

    Ok(Json(MessageResponse::new("User deleted")))
}
