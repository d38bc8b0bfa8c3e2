use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::SyncError;
use crate::models::slot::Slot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(SyncError::Invalid(format!("Unknown booking status: {}", other))),
        }
    }
}

/// A student's reservation of one slot.
///
/// The session fields are a snapshot of the slot taken when the booking was
/// created; later changes to the slot never flow back into the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub student_id: String,
    pub mentor_id: Uuid,
    pub slot_id: Uuid,
    pub session_date: NaiveDate,
    pub session_start: DateTime<Utc>,
    pub session_end: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Snapshots `slot` into a new confirmed booking stamped with `now`.
    pub fn confirmed(student_id: &str, slot: &Slot, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            student_id: student_id.to_string(),
            mentor_id: slot.mentor_id,
            slot_id: slot.id,
            session_date: slot.start_time.date_naive(),
            session_start: slot.start_time,
            session_end: slot.end_time,
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    pub fn is_owned_by(&self, student_id: &str) -> bool {
        self.student_id == student_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub student_id: String,
    pub slot_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    pub student_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingListQuery {
    pub student_id: Option<String>,
    pub status: Option<BookingStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MentorBookingsQuery {
    pub status: Option<BookingStatus>,
}
