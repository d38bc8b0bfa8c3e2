use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Result, WrapErr};
use slotsync_core::models::{
    booking::{Booking, BookingStatus},
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbMentor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSlot {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub student_id: String,
    pub mentor_id: Uuid,
    pub slot_id: Uuid,
    pub session_date: NaiveDate,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl TryFrom<DbMentor> for Mentor {
    type Error = eyre::Report;

    fn try_from(row: DbMentor) -> Result<Self> {
        let status = row
            .status
            .parse::<MentorStatus>()
            .wrap_err_with(|| format!("mentor {} has an unreadable status", row.id))?;

        Ok(Mentor {
            id: row.id,
            name: row.name,
            email: row.email,
            skills: row.skills,
            experience_years: row.experience_years,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<DbSlot> for Slot {
    fn from(row: DbSlot) -> Self {
        Slot {
            id: row.id,
            mentor_id: row.mentor_id,
            start_time: row.start_time,
            end_time: row.end_time,
            is_booked: row.is_booked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .wrap_err_with(|| format!("booking {} has an unreadable status", row.id))?;

        Ok(Booking {
            id: row.id,
            student_id: row.student_id,
            mentor_id: row.mentor_id,
            slot_id: row.slot_id,
            session_date: row.session_date,
            session_start: row.session_start,
            session_end: row.session_end,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            cancelled_at: row.cancelled_at,
        })
    }
}
