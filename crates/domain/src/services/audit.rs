//! Field-level change tracking for devices.
//!
//! The audited fields are listed once in [`TRACKED_FIELDS`]. Diffing, the
//! creation summary, and entry construction all iterate that table, so a field
//! added there is audited on every path.

use crate::models::{AuditAction, DeviceDraft, NewAuditEntry};

/// Rendered value for a device with no assignee.
pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Rendered value for a device with no location.
pub const LOCATION_NOT_SET_LABEL: &str = "Not set";

/// One audited device field.
pub struct TrackedField {
    pub name: &'static str,
    pub action: AuditAction,
    read: fn(&DeviceDraft) -> Option<String>,
    absent_label: &'static str,
}

impl TrackedField {
    /// The field's value as written to the log.
    pub fn render(&self, device: &DeviceDraft) -> String {
        (self.read)(device).unwrap_or_else(|| self.absent_label.to_string())
    }
}

pub static TRACKED_FIELDS: [TrackedField; 5] = [
    TrackedField {
        name: "device_name",
        action: AuditAction::NameChange,
        read: |d: &DeviceDraft| Some(d.device_name.clone()),
        absent_label: "",
    },
    TrackedField {
        name: "device_type",
        action: AuditAction::TypeChange,
        read: |d: &DeviceDraft| Some(d.device_type.clone()),
        absent_label: "",
    },
    TrackedField {
        name: "status",
        action: AuditAction::StatusChange,
        read: |d: &DeviceDraft| Some(d.status.as_str().to_string()),
        absent_label: "",
    },
    TrackedField {
        name: "assigned_user_id",
        action: AuditAction::AssignChange,
        read: |d: &DeviceDraft| d.assigned_user_id.map(|id| id.to_string()),
        absent_label: UNASSIGNED_LABEL,
    },
    TrackedField {
        name: "location",
        action: AuditAction::LocationChange,
        read: |d: &DeviceDraft| d.location.clone(),
        absent_label: LOCATION_NOT_SET_LABEL,
    },
];

/// A single observed change between two device states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTransition {
    pub field: &'static str,
    pub action: AuditAction,
    pub old_value: String,
    pub new_value: String,
}

/// Compares two device states and returns one transition per changed field,
/// in table order. Unchanged fields produce nothing.
pub fn diff_device(before: &DeviceDraft, after: &DeviceDraft) -> Vec<FieldTransition> {
    TRACKED_FIELDS
        .iter()
        .filter_map(|field| {
            let old_value = field.render(before);
            let new_value = field.render(after);
            (old_value != new_value).then(|| FieldTransition {
                field: field.name,
                action: field.action,
                old_value,
                new_value,
            })
        })
        .collect()
}

/// Turns transitions into entries attributed to `actor_id`.
pub fn transition_entries(
    device_id: i64,
    actor_id: i64,
    transitions: Vec<FieldTransition>,
) -> Vec<NewAuditEntry> {
    transitions
        .into_iter()
        .map(|t| NewAuditEntry {
            device_id,
            action: t.action,
            note: format!("{} changed", t.field),
            old_value: Some(t.old_value),
            new_value: Some(t.new_value),
            created_by: actor_id,
        })
        .collect()
}

/// The single entry written when a device is created. `new_value` summarizes
/// every tracked field.
pub fn created_entry(device_id: i64, actor_id: i64, device: &DeviceDraft) -> NewAuditEntry {
    let summary = TRACKED_FIELDS
        .iter()
        .map(|field| format!("{}={}", field.name, field.render(device)))
        .collect::<Vec<_>>()
        .join("; ");

    NewAuditEntry {
        device_id,
        action: AuditAction::Created,
        old_value: None,
        new_value: Some(summary),
        note: "Device created".to_string(),
        created_by: actor_id,
    }
}

/// The entry written before a device row is removed. Keeps the name so it can
/// still be read from history afterwards.
pub fn deleted_entry(device_id: i64, actor_id: i64, device_name: &str) -> NewAuditEntry {
    NewAuditEntry {
        device_id,
        action: AuditAction::Deleted,
        old_value: Some(device_name.to_string()),
        new_value: None,
        note: "Device deleted".to_string(),
        created_by: actor_id,
    }
}
