use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SyncError, SyncResult};

/// An availability window published by one mentor.
///
/// `is_booked` is the claim flag: it is true exactly while one confirmed
/// booking references this slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Slot {
    /// Builds a fresh, unclaimed slot.
    pub fn new(
        mentor_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> SyncResult<Self> {
        validate_window(start_time, end_time)?;

        Ok(Self {
            id: Uuid::new_v4(),
            mentor_id,
            start_time,
            end_time,
            is_booked: false,
            created_at: now,
            updated_at: now,
        })
    }
}

pub fn validate_window(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> SyncResult<()> {
    if start_time >= end_time {
        return Err(SyncError::Invalid(
            "End time must be after start time".to_string(),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSlotRequest {
    pub mentor_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleSlotRequest {
    pub mentor_id: Uuid,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawSlotRequest {
    pub mentor_id: Uuid,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotListQuery {
    pub available_only: Option<bool>,
}
