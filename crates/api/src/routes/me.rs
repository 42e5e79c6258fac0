//! Token introspection endpoints: whoami and the admin probe.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::extractors::CurrentUser;

#[derive(Debug, Serialize)]
pub struct TokenIdentity {
    pub user_id: i64,
    pub role: String,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub message: String,
    pub user: TokenIdentity,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Describe the caller from the token alone.
///
/// GET /api/me
pub async fn whoami(CurrentUser(auth): CurrentUser) -> Json<WhoamiResponse> {
    Json(WhoamiResponse {
        message: "You are authorized".to_string(),
        user: TokenIdentity {
            user_id: auth.user_id,
            role: auth.role,
            issued_at: auth.claims.issued_at(),
            expires_at: auth.claims.expires_at(),
        },
    })
}

/// GET /api/admin/secret
pub async fn admin_secret() -> Json<MessageResponse> {
    Json(MessageResponse::new("Admin access granted"))
}
