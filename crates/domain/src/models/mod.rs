//! Domain models for the AgriSense access layer.

pub mod audit_log;
pub mod device;
pub mod user;

pub use audit_log::{AuditAction, DeviceAuditEntry, DeviceHistoryEntry, NewAuditEntry};
pub use device::{
    Device, DeviceCreatedResponse, DeviceDraft, DeviceListItem, DevicePayload, DeviceStatus,
    ToggleStatusRequest, ToggleStatusResponse,
};
pub use user::{
    CreateUserRequest, LoginRequest, LoginResponse, Role, UpdateUserRequest, User, UserSummary,
};
