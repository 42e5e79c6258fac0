//! Device audit log domain models.
//!
//! Entries are append-only. One entry describes one field transition on one
//! device, so a single request may produce several entries or none.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of change an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Created,
    NameChange,
    TypeChange,
    StatusChange,
    AssignChange,
    LocationChange,
    Deleted,
}

impl AuditAction {
    pub const ALL: [AuditAction; 7] = [
        AuditAction::Created,
        AuditAction::NameChange,
        AuditAction::TypeChange,
        AuditAction::StatusChange,
        AuditAction::AssignChange,
        AuditAction::LocationChange,
        AuditAction::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "CREATED",
            AuditAction::NameChange => "NAME_CHANGE",
            AuditAction::TypeChange => "TYPE_CHANGE",
            AuditAction::StatusChange => "STATUS_CHANGE",
            AuditAction::AssignChange => "ASSIGN_CHANGE",
            AuditAction::LocationChange => "LOCATION_CHANGE",
            AuditAction::Deleted => "DELETED",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuditAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| format!("Unknown audit action: {}", s))
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceAuditEntry {
    pub id: i64,
    pub device_id: i64,
    pub action: AuditAction,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub note: String,
    /// Absent only for rows whose author could not be resolved.
    pub created_by: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// History row with the acting user's display name.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceHistoryEntry {
    #[serde(flatten)]
    pub entry: DeviceAuditEntry,
    pub created_by_name: Option<String>,
}

/// An entry about to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAuditEntry {
    pub device_id: i64,
    pub action: AuditAction,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub note: String,
    pub created_by: i64,
}
