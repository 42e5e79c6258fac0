//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod role;
pub mod trace_id;
pub mod user_auth;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use role::{require_admin, require_user_or_admin};
pub use trace_id::{trace_id, REQUEST_ID_HEADER};
pub use user_auth::{require_user_auth, UserAuth};
