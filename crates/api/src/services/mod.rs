//! Application services sitting between the routes and the repositories.

pub mod admin_bootstrap;
pub mod auth;
pub mod devices;
pub mod users;

pub use admin_bootstrap::{bootstrap_admin, BootstrapError, BootstrapOutcome};
pub use auth::{AuthError, AuthService};
pub use devices::{DeviceError, DeviceService};
pub use users::{UserAdminError, UserAdminService};
