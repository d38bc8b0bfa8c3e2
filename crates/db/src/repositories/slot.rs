use crate::models::DbSlot;
use chrono::{DateTime, Utc};
use eyre::Result;
use slotsync_core::models::slot::Slot;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

pub async fn insert_slot(conn: &mut PgConnection, slot: &Slot) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO slots (id, mentor_id, start_time, end_time, is_booked, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(slot.id)
    .bind(slot.mentor_id)
    .bind(slot.start_time)
    .bind(slot.end_time)
    .bind(slot.is_booked)
    .bind(slot.created_at)
    .bind(slot.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_slot_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbSlot>> {
    let slot = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, mentor_id, start_time, end_time, is_booked, created_at, updated_at
        FROM slots
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

pub async fn get_slots_by_mentor_id(
    pool: &Pool<Postgres>,
    mentor_id: Uuid,
    available_only: bool,
) -> Result<Vec<DbSlot>> {
    let slots = sqlx::query_as::<_, DbSlot>(
        r#"
        SELECT id, mentor_id, start_time, end_time, is_booked, created_at, updated_at
        FROM slots
        WHERE mentor_id = $1 AND (NOT $2 OR is_booked = FALSE)
        ORDER BY start_time ASC
        "#,
    )
    .bind(mentor_id)
    .bind(available_only)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

pub async fn slot_exists(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM slots WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(exists)
}

/// Sets `is_booked` only if the slot is currently free. Returns whether a
/// row changed.
pub async fn claim_slot(conn: &mut PgConnection, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET is_booked = TRUE, updated_at = $2
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .bind(at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn release_slot(conn: &mut PgConnection, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET is_booked = FALSE, updated_at = $2
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn reschedule_slot(
    conn: &mut PgConnection,
    id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    at: DateTime<Utc>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE slots
        SET start_time = $2, end_time = $3, updated_at = $4
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .bind(start_time)
    .bind(end_time)
    .bind(at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub async fn delete_unclaimed_slot(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM slots
        WHERE id = $1 AND is_booked = FALSE
        "#,
    )
    .bind(id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
