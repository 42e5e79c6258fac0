//! Domain services.
//!
//! Pure business rules with no I/O: the device audit diff and the access policy.

pub mod access;
pub mod audit;

pub use access::{ensure_can_toggle, require_role, AccessError, Actor, ADMIN_ONLY, USER_OR_ADMIN};
pub use audit::{created_entry, deleted_entry, diff_device, transition_entries, FieldTransition};
