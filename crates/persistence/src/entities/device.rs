//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Device, DeviceListItem, DeviceStatus};
use sqlx::FromRow;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: i64,
    pub device_name: String,
    pub device_type: String,
    pub status: String,
    pub location: Option<String>,
    pub assigned_user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceEntity> for Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            device_name: entity.device_name,
            device_type: entity.device_type,
            status: entity.status.parse::<DeviceStatus>().unwrap_or_default(),
            location: entity.location,
            assigned_user_id: entity.assigned_user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Device row joined with the assignee's display name.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceWithAssigneeEntity {
    #[sqlx(flatten)]
    pub device: DeviceEntity,
    pub assigned_user_name: Option<String>,
}

impl From<DeviceWithAssigneeEntity> for DeviceListItem {
    fn from(entity: DeviceWithAssigneeEntity) -> Self {
        Self {
            device: entity.device.into(),
            assigned_user_name: entity.assigned_user_name,
        }
    }
}
