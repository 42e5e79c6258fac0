//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{normalize_optional_text, validate_not_blank};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Power state of a managed device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeviceStatus {
    #[serde(rename = "ON")]
    On,
    #[default]
    #[serde(rename = "OFF")]
    Off,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::On => "ON",
            DeviceStatus::Off => "OFF",
        }
    }
}

impl FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ON" => Ok(DeviceStatus::On),
            "OFF" => Ok(DeviceStatus::Off),
            _ => Err("status must be ON or OFF".to_string()),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A device held by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Device {
    pub id: i64,
    pub device_name: String,
    pub device_type: String,
    pub status: DeviceStatus,
    pub location: Option<String>,
    pub assigned_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Device row in the admin listing, with the assignee's display name.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceListItem {
    #[serde(flatten)]
    pub device: Device,
    pub assigned_user_name: Option<String>,
}

/// A blank status falls back to OFF; anything else must be ON or OFF.
fn validate_optional_status(status: &str) -> Result<(), validator::ValidationError> {
    if status.trim().is_empty() {
        return Ok(());
    }
    DeviceStatus::from_str(status).map(|_| ()).map_err(|msg| {
        let mut err = validator::ValidationError::new("invalid_status");
        err.message = Some(msg.into());
        err
    })
}

fn validate_required_status(status: &str) -> Result<(), validator::ValidationError> {
    DeviceStatus::from_str(status).map(|_| ()).map_err(|msg| {
        let mut err = validator::ValidationError::new("invalid_status");
        err.message = Some(msg.into());
        err
    })
}

/// Request body for `POST /api/devices` and `PUT /api/devices/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct DevicePayload {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "device_name and device_type required"))]
    pub device_name: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "device_name and device_type required"))]
    pub device_type: String,

    #[validate(custom(function = "validate_optional_status"))]
    pub status: Option<String>,

    pub assigned_user_id: Option<i64>,

    pub location: Option<String>,
}

impl DevicePayload {
    /// Normalizes the payload into the values that will be persisted.
    ///
    /// Names are trimmed, status is upper-cased with OFF as the default,
    /// non-positive assignee ids and blank locations become absent.
    pub fn into_draft(self) -> Result<DeviceDraft, String> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => DeviceStatus::default(),
            Some(s) => DeviceStatus::from_str(s)?,
        };

        Ok(DeviceDraft {
            device_name: self.device_name.trim().to_string(),
            device_type: self.device_type.trim().to_string(),
            status,
            assigned_user_id: self.assigned_user_id.filter(|id| *id > 0),
            location: normalize_optional_text(self.location.as_deref()),
        })
    }
}

/// The mutable fields of a device, as stored or as about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDraft {
    pub device_name: String,
    pub device_type: String,
    pub status: DeviceStatus,
    pub assigned_user_id: Option<i64>,
    pub location: Option<String>,
}

impl From<&Device> for DeviceDraft {
    fn from(device: &Device) -> Self {
        Self {
            device_name: device.device_name.clone(),
            device_type: device.device_type.clone(),
            status: device.status,
            assigned_user_id: device.assigned_user_id,
            location: device.location.clone(),
        }
    }
}

/// Request body for `POST /api/device-control/:id/toggle`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleStatusRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_required_status"))]
    pub status: String,
}

impl ToggleStatusRequest {
    pub fn target_status(&self) -> Result<DeviceStatus, String> {
        DeviceStatus::from_str(&self.status)
    }
}

/// Response after creating a device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceCreatedResponse {
    pub message: String,
    pub id: i64,
}

/// Response after a status toggle.
#[derive(Debug, Clone, Serialize)]
pub struct ToggleStatusResponse {
    pub message: String,
    pub status: DeviceStatus,
}
