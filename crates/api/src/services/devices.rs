//! Device registry orchestration.
//!
//! Every mutation runs in one transaction: lock the row, write the change,
//! append its audit entries, commit. Either the change and its complete audit
//! trail land together or neither does.

use domain::models::{
    AuditAction, Device, DeviceDraft, DeviceHistoryEntry, DeviceListItem, DeviceStatus,
    NewAuditEntry,
};
use domain::services::access::{ensure_can_toggle, AccessError, Actor};
use domain::services::audit::{created_entry, deleted_entry, diff_device, transition_entries};
use persistence::repositories::{AuditLogRepository, DeviceRepository, UserRepository};
use sqlx::{PgConnection, PgPool};
use thiserror::Error;

use crate::middleware::metrics::record_audit_entries;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("Device not found")]
    NotFound,

    #[error("Assigned user {0} does not exist")]
    UnknownAssignee(i64),

    #[error(transparent)]
    Forbidden(#[from] AccessError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Device registry operations with their audit trail.
#[derive(Clone)]
pub struct DeviceService {
    pool: PgPool,
    devices: DeviceRepository,
    audit: AuditLogRepository,
}

impl DeviceService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            devices: DeviceRepository::new(pool.clone()),
            audit: AuditLogRepository::new(pool.clone()),
            pool,
        }
    }

    /// All devices with assignee names, newest first.
    pub async fn list(&self) -> Result<Vec<DeviceListItem>, DeviceError> {
        let rows = self.devices.list_with_assignee().await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Devices assigned to `user_id`, newest first.
    pub async fn list_assigned_to(&self, user_id: i64) -> Result<Vec<Device>, DeviceError> {
        let rows = self.devices.list_assigned_to(user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Audit history of a device, newest first. Still readable after the
    /// device itself is deleted.
    pub async fn history(&self, device_id: i64) -> Result<Vec<DeviceHistoryEntry>, DeviceError> {
        let rows = self.audit.list_for_device(device_id).await?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(DeviceError::from))
            .collect()
    }

    pub async fn create(&self, actor: &Actor, draft: DeviceDraft) -> Result<Device, DeviceError> {
        let mut tx = self.pool.begin().await?;

        ensure_assignee_exists(&mut *tx, draft.assigned_user_id).await?;
        let device: Device = DeviceRepository::insert(&mut *tx, &draft).await?.into();
        let actions = append_all(&mut *tx, vec![created_entry(device.id, actor.user_id, &draft)]).await?;

        tx.commit().await?;
        record_audit_entries(&actions);

        tracing::info!(device_id = device.id, actor_id = actor.user_id, "Device created");
        Ok(device)
    }

    /// Replace every mutable field and record one entry per changed field.
    pub async fn update(
        &self,
        actor: &Actor,
        id: i64,
        draft: DeviceDraft,
    ) -> Result<Device, DeviceError> {
        let mut tx = self.pool.begin().await?;

        let current: Device = DeviceRepository::lock_by_id(&mut *tx, id)
            .await?
            .ok_or(DeviceError::NotFound)?
            .into();
        ensure_assignee_exists(&mut *tx, draft.assigned_user_id).await?;

        let transitions = diff_device(&DeviceDraft::from(&current), &draft);
        let device: Device = DeviceRepository::update(&mut *tx, id, &draft).await?.into();
        let actions = append_all(&mut *tx, transition_entries(id, actor.user_id, transitions)).await?;

        tx.commit().await?;
        record_audit_entries(&actions);

        tracing::info!(
            device_id = id,
            actor_id = actor.user_id,
            changes = actions.len(),
            "Device updated"
        );
        Ok(device)
    }

    /// Remove a device. The DELETED entry is written first, in the same
    /// transaction, so the name survives in history.
    pub async fn delete(&self, actor: &Actor, id: i64) -> Result<(), DeviceError> {
        let mut tx = self.pool.begin().await?;

        let current = DeviceRepository::lock_by_id(&mut *tx, id)
            .await?
            .ok_or(DeviceError::NotFound)?;
        let actions = append_all(
            &mut *tx,
            vec![deleted_entry(id, actor.user_id, &current.device_name)],
        )
        .await?;
        DeviceRepository::delete(&mut *tx, id).await?;

        tx.commit().await?;
        record_audit_entries(&actions);

        tracing::info!(device_id = id, actor_id = actor.user_id, "Device deleted");
        Ok(())
    }

    /// Set a device's status, subject to the ownership gate.
    ///
    /// Setting the status it already has succeeds without writing anything.
    pub async fn toggle_status(
        &self,
        actor: &Actor,
        id: i64,
        status: DeviceStatus,
    ) -> Result<DeviceStatus, DeviceError> {
        let mut tx = self.pool.begin().await?;

        let current = DeviceRepository::lock_by_id(&mut *tx, id).await?;
        ensure_can_toggle(actor, current.as_ref().map(|d| d.assigned_user_id))?;
        let current: Device = current.ok_or(DeviceError::NotFound)?.into();

        if current.status == status {
            tx.commit().await?;
            return Ok(status);
        }

        let before = DeviceDraft::from(&current);
        let after = DeviceDraft { status, ..before.clone() };
        DeviceRepository::update_status(&mut *tx, id, status).await?;
        let actions = append_all(
            &mut *tx,
            transition_entries(id, actor.user_id, diff_device(&before, &after)),
        )
        .await?;

        tx.commit().await?;
        record_audit_entries(&actions);

        tracing::info!(
            device_id = id,
            actor_id = actor.user_id,
            status = %status,
            "Device status changed"
        );
        Ok(status)
    }
}

async fn ensure_assignee_exists(
    conn: &mut PgConnection,
    assigned_user_id: Option<i64>,
) -> Result<(), DeviceError> {
    if let Some(user_id) = assigned_user_id {
        if !UserRepository::exists_on(conn, user_id).await? {
            return Err(DeviceError::UnknownAssignee(user_id));
        }
    }
    Ok(())
}

async fn append_all(
    conn: &mut PgConnection,
    entries: Vec<NewAuditEntry>,
) -> Result<Vec<AuditAction>, sqlx::Error> {
    let mut actions = Vec::with_capacity(entries.len());
    for entry in &entries {
        AuditLogRepository::append(conn, entry).await?;
        actions.push(entry.action);
    }
    Ok(actions)
}

/// Unassign every device held by `user_id`, one ASSIGN_CHANGE entry each.
///
/// Runs on the caller's transaction; metrics are the caller's job after
/// commit.
pub(crate) async fn release_assignments(
    conn: &mut PgConnection,
    actor: &Actor,
    user_id: i64,
) -> Result<Vec<AuditAction>, sqlx::Error> {
    let held = DeviceRepository::lock_assigned_to(conn, user_id).await?;
    let mut actions = Vec::new();

    for entity in held {
        let device: Device = entity.into();
        let before = DeviceDraft::from(&device);
        let after = DeviceDraft {
            assigned_user_id: None,
            ..before.clone()
        };

        DeviceRepository::update(conn, device.id, &after).await?;
        let entries = transition_entries(device.id, actor.user_id, diff_device(&before, &after));
        actions.extend(append_all(conn, entries).await?);
    }

    Ok(actions)
}
