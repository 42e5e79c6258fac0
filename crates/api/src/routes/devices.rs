//! Device registry endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{
    Device, DeviceCreatedResponse, DeviceHistoryEntry, DeviceListItem, DevicePayload,
    ToggleStatusRequest, ToggleStatusResponse,
};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{CurrentActor, JsonBody};
use crate::routes::me::MessageResponse;
use crate::routes::parse_id;
use crate::services::{DeviceError, DeviceService};

fn map_error(err: DeviceError) -> ApiError {
    match err {
        DeviceError::NotFound => ApiError::NotFound("Device not found".to_string()),
        DeviceError::UnknownAssignee(_) => {
            ApiError::Validation("assigned_user_id does not reference an existing user".to_string())
        }
        DeviceError::Forbidden(e) => e.into(),
        DeviceError::Database(e) => e.into(),
    }
}

/// GET /api/devices
pub async fn list_devices(
    State(state): State<AppState>,
) -> Result<Json<Vec<DeviceListItem>>, ApiError> {
    let devices = DeviceService::new(state.pool.clone())
        .list()
        .await
        .map_err(map_error)?;
    Ok(Json(devices))
}

/// POST /api/devices
pub async fn create_device(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    JsonBody(payload): JsonBody<DevicePayload>,
) -> Result<Json<DeviceCreatedResponse>, ApiError> {
    payload.validate()?;
    let draft = payload.into_draft().map_err(ApiError::Validation)?;

    let device = DeviceService::new(state.pool.clone())
        .create(&actor, draft)
        .await
        .map_err(map_error)?;

    Ok(Json(DeviceCreatedResponse {
        message: "Device created".to_string(),
        id: device.id,
    }))
}

/// PUT /api/devices/:id
pub async fn update_device(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(raw_id): Path<String>,
    JsonBody(payload): JsonBody<DevicePayload>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id, "Invalid id")?;
    payload.validate()?;
    let draft = payload.into_draft().map_err(ApiError::Validation)?;

    DeviceService::new(state.pool.clone())
        .update(&actor, id, draft)
        .await
        .map_err(map_error)?;

    Ok(Json(MessageResponse::new("Device updated")))
}

/// DELETE /api/devices/:id
pub async fn delete_device(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(&raw_id, "Invalid id")?;

    DeviceService::new(state.pool.clone())
        .delete(&actor, id)
        .await
        .map_err(map_error)?;

    Ok(Json(MessageResponse::new("Device deleted")))
}

/// GET /api/devices/:id/history
pub async fn device_history(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<DeviceHistoryEntry>>, ApiError> {
    let id = parse_id(&raw_id, "Invalid id")?;

    let history = DeviceService::new(state.pool.clone())
        .history(id)
        .await
        .map_err(map_error)?;
    Ok(Json(history))
}

/// Devices assigned to the caller.
///
/// GET /api/my/devices
pub async fn my_devices(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Device>>, ApiError> {
    let devices = DeviceService::new(state.pool.clone())
        .list_assigned_to(actor.user_id)
        .await
        .map_err(map_error)?;
    Ok(Json(devices))
}

/// Switch a device ON or OFF. Non-admins may only switch their own devices.
///
/// POST /api/device-control/:id/toggle
pub async fn toggle_device(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(raw_id): Path<String>,
    JsonBody(request): JsonBody<ToggleStatusRequest>,
) -> Result<Json<ToggleStatusResponse>, ApiError> {
    let id = parse_id(&raw_id, "Invalid device id")?;
    request.validate()?;
    let status = request.target_status().map_err(ApiError::Validation)?;

    let status = DeviceService::new(state.pool.clone())
        .toggle_status(&actor, id, status)
        .await
        .map_err(map_error)?;

    Ok(Json(ToggleStatusResponse {
        message: "Device status updated".to_string(),
        status,
    }))
}
