//! Custom Axum extractors.

pub mod auth;
pub mod json;

pub use auth::{CurrentActor, CurrentUser};
pub use json::JsonBody;
