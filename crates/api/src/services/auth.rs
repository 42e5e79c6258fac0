//! Authenticator: credential check and session token issuance.

use std::sync::Arc;

use domain::models::{LoginResponse, Role, User};
use persistence::repositories::UserRepository;
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{verify_against_dummy, verify_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use crate::middleware::metrics::{record_login, LoginOutcome};

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Verifies credentials against the credential store and mints tokens.
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(pool: PgPool, jwt: Arc<JwtConfig>) -> Self {
        Self {
            users: UserRepository::new(pool),
            jwt,
        }
    }

    /// Authenticate by email and password.
    ///
    /// The email must match exactly. The stored value is always treated as a
    /// password hash; a row holding anything else never authenticates.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let result = self.try_login(email, password).await;

        record_login(match &result {
            Ok(_) => LoginOutcome::Success,
            Err(AuthError::UserNotFound | AuthError::InvalidCredentials) => LoginOutcome::Rejected,
            Err(_) => LoginOutcome::Error,
        });

        result
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        let user: User = match self.users.find_by_email(email).await? {
            Some(entity) => entity.into(),
            None => {
                verify_against_dummy(password);
                return Err(AuthError::UserNotFound);
            }
        };

        let matches = match verify_password(password, &user.password_hash) {
            Ok(matches) => matches,
            Err(PasswordError::InvalidHashFormat) => {
                tracing::warn!(user_id = user.id, "Stored credential is not a password hash");
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !matches {
            return Err(AuthError::InvalidCredentials);
        }

        let issued = self.issue_token(user.id, user.role)?;

        tracing::info!(user_id = user.id, role = %user.role, "User logged in");

        Ok(LoginResponse {
            token: issued,
            role: user.role,
        })
    }

    fn issue_token(&self, user_id: i64, role: Role) -> Result<String, JwtError> {
        Ok(self.jwt.generate_token(user_id, role.as_str())?.token)
    }
}
