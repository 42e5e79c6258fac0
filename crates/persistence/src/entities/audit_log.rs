//! Device audit log entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{AuditAction, DeviceAuditEntry, DeviceHistoryEntry};
use sqlx::FromRow;

/// Database row mapping for the device_audit_logs table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceAuditLogEntity {
    pub id: i64,
    pub device_id: i64,
    pub action: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub note: String,
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

impl DeviceAuditLogEntity {
    /// Convert to domain model. Fails on an action the domain does not know.
    pub fn into_domain(self) -> Result<DeviceAuditEntry, sqlx::Error> {
        let action = self
            .action
            .parse::<AuditAction>()
            .map_err(|e| sqlx::Error::Decode(e.into()))?;

        Ok(DeviceAuditEntry {
            id: self.id,
            device_id: self.device_id,
            action,
            old_value: self.old_value,
            new_value: self.new_value,
            note: self.note,
            created_by: self.created_by,
            created_at: self.created_at,
        })
    }
}

/// Audit row joined with the acting user's display name.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceHistoryEntity {
    #[sqlx(flatten)]
    pub entry: DeviceAuditLogEntity,
    pub created_by_name: Option<String>,
}

impl DeviceHistoryEntity {
    pub fn into_domain(self) -> Result<DeviceHistoryEntry, sqlx::Error> {
        Ok(DeviceHistoryEntry {
            entry: self.entry.into_domain()?,
            created_by_name: self.created_by_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(action: &str) -> DeviceAuditLogEntity {
        DeviceAuditLogEntity {
            id: 1,
            device_id: 7,
            action: action.to_string(),
            old_value: Some("OFF".to_string()),
            new_value: Some("ON".to_string()),
            note: "status changed".to_string(),
            created_by: Some(1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_audit_entity_to_domain() {
        let entry = entity("STATUS_CHANGE").into_domain().unwrap();
        assert_eq!(entry.action, AuditAction::StatusChange);
        assert_eq!(entry.old_value.as_deref(), Some("OFF"));
    }

    #[test]
    fn test_unknown_action_is_decode_error() {
        let result = entity("UPDATED").into_domain();
        assert!(matches!(result, Err(sqlx::Error::Decode(_))));
    }

    #[test]
    fn test_history_entity_to_domain() {
        let history = DeviceHistoryEntity {
            entry: entity("CREATED"),
            created_by_name: None,
        }
        .into_domain()
        .unwrap();
        assert_eq!(history.entry.action, AuditAction::Created);
        assert!(history.created_by_name.is_none());
    }
}
