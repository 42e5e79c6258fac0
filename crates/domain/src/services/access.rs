//! Role and ownership policy.
//!
//! Checks run as ordered gates: role first, ownership second. Both are pure
//! functions over the identity carried by a validated session token.

use std::str::FromStr;

use thiserror::Error;

use crate::models::Role;

/// Roles allowed on admin-only operations.
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Roles allowed on operations open to any signed-in account.
pub const USER_OR_ADMIN: &[Role] = &[Role::User, Role::Admin];

/// Policy denial. Every variant maps to 403.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Role not found")]
    MissingRole,

    #[error("Forbidden")]
    RoleNotAllowed,

    #[error("Forbidden")]
    NotOwner,
}

/// Normalizes a role claim. Empty or unknown values yield `None`.
pub fn normalize_role(raw: Option<&str>) -> Option<Role> {
    raw.map(str::trim)
        .filter(|r| !r.is_empty())
        .and_then(|r| Role::from_str(r).ok())
}

/// Passes when the claimed role is in `allowed`.
pub fn require_role(raw: Option<&str>, allowed: &[Role]) -> Result<Role, AccessError> {
    let blank = raw.map(|r| r.trim().is_empty()).unwrap_or(true);
    if blank {
        return Err(AccessError::MissingRole);
    }

    match normalize_role(raw) {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(AccessError::RoleNotAllowed),
    }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Ownership gate for status toggles.
///
/// Admins bypass it. Anyone else must be the device's assignee; a device that
/// does not exist (`None` as the outer option) is denied the same way so its
/// existence is not revealed.
pub fn ensure_can_toggle(actor: &Actor, assigned_user_id: Option<Option<i64>>) -> Result<(), AccessError> {
    if actor.is_admin() {
        return Ok(());
    }

    match assigned_user_id {
        Some(Some(owner)) if owner == actor.user_id => Ok(()),
        _ => Err(AccessError::NotOwner),
    }
}
