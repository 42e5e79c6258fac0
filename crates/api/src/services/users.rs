//! User administration.

use domain::models::{CreateUserRequest, Role, UpdateUserRequest, UserSummary};
use domain::services::access::Actor;
use persistence::repositories::UserRepository;
use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use thiserror::Error;

use crate::middleware::metrics::record_audit_entries;
use crate::services::devices::release_assignments;

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("Email already exists")]
    EmailTaken,

    #[error("Cannot delete your own account")]
    SelfDelete,

    #[error("Invalid role")]
    InvalidRole,

    #[error("User not found")]
    NotFound,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for UserAdminError {
    fn from(err: sqlx::Error) -> Self {
        // Lost a race on the unique email index.
        if is_unique_violation(&err) {
            UserAdminError::EmailTaken
        } else {
            UserAdminError::Database(err)
        }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

#[derive(Clone)]
pub struct UserAdminService {
    pool: PgPool,
    users: UserRepository,
}

impl UserAdminService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }

    /// All users, newest first. Never includes password hashes.
    pub async fn list(&self) -> Result<Vec<UserSummary>, UserAdminError> {
        let rows = self.users.list().await?;
        Ok(rows
            .into_iter()
            .map(|e| UserSummary::from(domain::models::User::from(e)))
            .collect())
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<UserSummary, UserAdminError> {
        if self.users.email_owner(&req.email).await?.is_some() {
            return Err(UserAdminError::EmailTaken);
        }

        let role = req.role();
        let password_hash = hash_password(&req.password)?;
        let entity = self
            .users
            .create(req.full_name.trim(), &req.email, &password_hash, role.as_str())
            .await?;

        tracing::info!(user_id = entity.id, role = %role, "User created");
        Ok(domain::models::User::from(entity).into())
    }

    /// Update profile and role. The password hash changes only when a
    /// non-blank password is supplied.
    pub async fn update(
        &self,
        id: i64,
        req: &UpdateUserRequest,
    ) -> Result<UserSummary, UserAdminError> {
        let role: Role = req.role().ok_or(UserAdminError::InvalidRole)?;

        if let Some(owner) = self.users.email_owner(&req.email).await? {
            if owner != id {
                return Err(UserAdminError::EmailTaken);
            }
        }

        let password_hash = req.new_password().map(hash_password).transpose()?;
        let entity = self
            .users
            .update(
                id,
                req.full_name.trim(),
                &req.email,
                role.as_str(),
                password_hash.as_deref(),
            )
            .await?
            .ok_or(UserAdminError::NotFound)?;

        tracing::info!(
            user_id = id,
            role = %role,
            password_changed = password_hash.is_some(),
            "User updated"
        );
        Ok(domain::models::User::from(entity).into())
    }

    /// Delete a user. An actor can never delete their own account.
    ///
    /// Devices assigned to the user are unassigned first, with one
    /// ASSIGN_CHANGE entry each, in the same transaction as the delete.
    pub async fn delete(&self, actor: &Actor, id: i64) -> Result<(), UserAdminError> {
        if actor.user_id == id {
            return Err(UserAdminError::SelfDelete);
        }

        let mut tx = self.pool.begin().await?;

        let actions = release_assignments(&mut *tx, actor, id).await?;
        if UserRepository::delete(&mut *tx, id).await? == 0 {
            return Err(UserAdminError::NotFound);
        }

        tx.commit().await?;
        record_audit_entries(&actions);

        tracing::info!(
            user_id = id,
            actor_id = actor.user_id,
            released_devices = actions.len(),
            "User deleted"
        );
        Ok(())
    }
}
