use crate::models::DbBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use slotsync_core::models::booking::Booking;
use sqlx::{PgConnection, Pool, Postgres};
use uuid::Uuid;

const BOOKING_COLUMNS: &str = "id, student_id, mentor_id, slot_id, session_date, session_start, \
     session_end, status, created_at, updated_at, cancelled_at";

pub async fn insert_booking(conn: &mut PgConnection, booking: &Booking) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO bookings (
            id, student_id, mentor_id, slot_id, session_date, session_start,
            session_end, status, created_at, updated_at, cancelled_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(booking.id)
    .bind(&booking.student_id)
    .bind(booking.mentor_id)
    .bind(booking.slot_id)
    .bind(booking.session_date)
    .bind(booking.session_start)
    .bind(booking.session_end)
    .bind(booking.status.as_str())
    .bind(booking.created_at)
    .bind(booking.updated_at)
    .bind(booking.cancelled_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    let booking = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings WHERE id = $1",
        BOOKING_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn get_bookings_by_student_id(
    pool: &Pool<Postgres>,
    student_id: &str,
    status: Option<&str>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings \
         WHERE student_id = $1 AND ($2::VARCHAR IS NULL OR status = $2) \
         ORDER BY session_start ASC",
        BOOKING_COLUMNS
    ))
    .bind(student_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_bookings_by_mentor_id(
    pool: &Pool<Postgres>,
    mentor_id: Uuid,
    status: Option<&str>,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(&format!(
        "SELECT {} FROM bookings \
         WHERE mentor_id = $1 AND ($2::VARCHAR IS NULL OR status = $2) \
         ORDER BY session_start ASC",
        BOOKING_COLUMNS
    ))
    .bind(mentor_id)
    .bind(status)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn booking_exists(conn: &mut PgConnection, id: Uuid) -> Result<bool> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = $1)")
            .bind(id)
            .fetch_one(conn)
            .await?;

    Ok(exists)
}

/// Moves a confirmed booking to cancelled. Returns whether a row changed.
pub async fn cancel_booking(conn: &mut PgConnection, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE bookings
        SET status = 'cancelled', cancelled_at = $2, updated_at = $2
        WHERE id = $1 AND status = 'confirmed'
        "#,
    )
    .bind(id)
    .bind(at)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
