//! User and credential domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::password::is_blank;
use shared::validation::validate_not_blank;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Role assigned to a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A user account as held by the credential store.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct User {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)] // Never serialize password hash to API responses
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// User row as returned by the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserSummary {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password required"))]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

fn validate_role(role: &str) -> Result<(), validator::ValidationError> {
    Role::from_str(role).map(|_| ()).map_err(|_| {
        let mut err = validator::ValidationError::new("invalid_role");
        err.message = Some("Role must be 'admin' or 'user'".into());
        err
    })
}

/// Request body for `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "full_name, email, password required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "full_name, email, password required"))]
    pub password: String,

    /// Defaults to `user` when omitted.
    #[validate(custom(function = "validate_role"))]
    pub role: Option<String>,
}

impl CreateUserRequest {
    pub fn role(&self) -> Role {
        self.role
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .and_then(|r| Role::from_str(r).ok())
            .unwrap_or(Role::User)
    }
}

/// Request body for `PUT /api/users/:id`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank", message = "full_name, email, role required"))]
    pub full_name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(custom(function = "validate_role"))]
    pub role: String,

    /// Blank or missing keeps the stored hash.
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn role(&self) -> Option<Role> {
        Role::from_str(&self.role).ok()
    }

    /// The replacement password, if one was actually supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !is_blank(p))
    }
}
