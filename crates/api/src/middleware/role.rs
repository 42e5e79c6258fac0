//! Role gates.
//!
//! Run after [`require_user_auth`](super::user_auth::require_user_auth). A
//! passing request gets an [`Actor`] in its extensions for the handlers.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::Role;
use domain::services::access::{require_role, Actor, ADMIN_ONLY, USER_OR_ADMIN};
use serde_json::json;

use super::user_auth::{unauthorized_response, UserAuth};

async fn gate(allowed: &[Role], mut req: Request<Body>, next: Next) -> Response {
    let Some(auth) = req.extensions().get::<UserAuth>().cloned() else {
        return unauthorized_response("No token provided");
    };

    match require_role(Some(auth.role.as_str()), allowed) {
        Ok(role) => {
            req.extensions_mut().insert(Actor::new(auth.user_id, role));
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(user_id = auth.user_id, "Role check failed: {}", e);
            forbidden_response(&e.to_string())
        }
    }
}

/// Middleware that requires the admin role.
pub async fn require_admin(req: Request<Body>, next: Next) -> Response {
    gate(ADMIN_ONLY, req, next).await
}

/// Middleware that admits any signed-in user or admin.
pub async fn require_user_or_admin(req: Request<Body>, next: Next) -> Response {
    gate(USER_OR_ADMIN, req, next).await
}

/// Helper to create forbidden response.
fn forbidden_response(message: &str) -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": message
        })),
    )
        .into_response()
}
