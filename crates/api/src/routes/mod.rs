//! HTTP route handlers.

pub mod auth;
pub mod devices;
pub mod health;
pub mod me;
pub mod users;

use shared::validation::validate_positive_id;

use crate::error::ApiError;

/// Parses a numeric path id, rejecting anything that is not a positive integer.
pub(crate) fn parse_id(raw: &str, message: &str) -> Result<i64, ApiError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|id| validate_positive_id(*id).is_ok())
        .ok_or_else(|| ApiError::Validation(message.to_string()))
}
