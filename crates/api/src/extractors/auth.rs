//! Extractors for the identity placed in extensions by the auth middleware.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use domain::services::access::Actor;

use crate::error::ApiError;
use crate::middleware::user_auth::UserAuth;

/// The validated token identity. Requires `require_user_auth` on the route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserAuth);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserAuth>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))
    }
}

/// The caller after a role gate. Requires `require_admin` or
/// `require_user_or_admin` on the route.
#[derive(Debug, Clone, Copy)]
pub struct CurrentActor(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .copied()
            .map(CurrentActor)
            .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))
    }
}
