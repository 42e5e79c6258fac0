//! Repository implementations for database operations.

pub mod audit_log;
pub mod device;
pub mod user;

pub use audit_log::AuditLogRepository;
pub use device::DeviceRepository;
pub use user::UserRepository;
