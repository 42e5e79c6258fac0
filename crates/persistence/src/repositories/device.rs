//! Device repository for database operations.
//!
//! Reads go through the pool. Mutations take the caller's connection so the
//! row lock, the write, and the audit entries share one transaction.

use domain::models::{DeviceDraft, DeviceStatus};
use sqlx::{PgConnection, PgPool};

use crate::entities::{DeviceEntity, DeviceWithAssigneeEntity};
use crate::metrics::QueryTimer;

const DEVICE_COLUMNS: &str =
    "id, device_name, device_type, status, location, assigned_user_id, created_at, updated_at";

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All devices with their assignee's name, newest first.
    pub async fn list_with_assignee(&self) -> Result<Vec<DeviceWithAssigneeEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_devices_with_assignee");
        let result = sqlx::query_as::<_, DeviceWithAssigneeEntity>(
            r#"
            SELECT d.id, d.device_name, d.device_type, d.status, d.location,
                   d.assigned_user_id, d.created_at, d.updated_at,
                   u.full_name AS assigned_user_name
            FROM devices d
            LEFT JOIN users u ON u.id = d.assigned_user_id
            ORDER BY d.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Devices assigned to `user_id`, newest first.
    pub async fn list_assigned_to(&self, user_id: i64) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_devices_assigned_to");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE assigned_user_id = $1 ORDER BY id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Fetch a device and lock its row until the transaction ends.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_device_by_id");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Lock every device assigned to `user_id`, oldest first.
    pub async fn lock_assigned_to(
        conn: &mut PgConnection,
        user_id: i64,
    ) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_devices_assigned_to");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM devices WHERE assigned_user_id = $1 ORDER BY id FOR UPDATE"
        ))
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Insert a device.
    pub async fn insert(
        conn: &mut PgConnection,
        draft: &DeviceDraft,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            INSERT INTO devices (device_name, device_type, status, assigned_user_id, location)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(&draft.device_name)
        .bind(&draft.device_type)
        .bind(draft.status.as_str())
        .bind(draft.assigned_user_id)
        .bind(&draft.location)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Overwrite every mutable field of a device.
    pub async fn update(
        conn: &mut PgConnection,
        id: i64,
        draft: &DeviceDraft,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET device_name = $2,
                device_type = $3,
                status = $4,
                assigned_user_id = $5,
                location = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.device_name)
        .bind(&draft.device_type)
        .bind(draft.status.as_str())
        .bind(draft.assigned_user_id)
        .bind(&draft.location)
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Set only the status of a device.
    pub async fn update_status(
        conn: &mut PgConnection,
        id: i64,
        status: DeviceStatus,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_device_status");
        let result = sqlx::query_as::<_, DeviceEntity>(&format!(
            r#"
            UPDATE devices
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {DEVICE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_one(&mut *conn)
        .await;
        timer.record();
        result
    }

    /// Delete a device. Returns the number of rows removed.
    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_device");
        let result = sqlx::query("DELETE FROM devices WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
