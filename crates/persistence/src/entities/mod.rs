//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod audit_log;
pub mod device;
pub mod user;

pub use audit_log::{DeviceAuditLogEntity, DeviceHistoryEntity};
pub use device::{DeviceEntity, DeviceWithAssigneeEntity};
pub use user::UserEntity;
