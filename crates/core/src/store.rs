//! # Durable Store
//!
//! The record store the ledgers are written against. A backend must offer
//! get-by-id reads, filtered listings, and [`DurableStore::transact`]: a batch
//! of [`LedgerWrite`]s that commits all-or-nothing, where each conditional
//! write re-checks its precondition at commit time.
//!
//! Two implementations exist: [`memory::MemoryStore`] in this crate and the
//! PostgreSQL-backed `PgStore` in `slotsync-db`.

pub mod memory;

use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    booking::{Booking, BookingStatus},
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};

pub use memory::MemoryStore;

/// Identifies the record a write touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordRef {
    Mentor(Uuid),
    Slot(Uuid),
    Booking(Uuid),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Mentor(id) => write!(f, "mentor {}", id),
            RecordRef::Slot(id) => write!(f, "slot {}", id),
            RecordRef::Booking(id) => write!(f, "booking {}", id),
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    /// A conditional write found its precondition false at commit time.
    #[error("precondition failed on {0}")]
    ConditionFailed(RecordRef),

    #[error("record missing: {0}")]
    MissingRecord(RecordRef),

    #[error("duplicate key: {0}")]
    DuplicateKey(RecordRef),

    #[error("store unavailable: {0}")]
    Unavailable(#[from] eyre::Report),
}

/// One write inside a [`DurableStore::transact`] batch.
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerWrite {
    InsertMentor(Mentor),
    InsertSlot(Slot),
    /// Moves the window of a slot. Requires the slot to be unclaimed.
    RescheduleSlot {
        slot_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        at: DateTime<Utc>,
    },
    /// Removes a slot. Requires the slot to be unclaimed.
    DeleteSlot { slot_id: Uuid },
    /// Flips the claim flag false -> true. Requires the slot to be unclaimed.
    ClaimSlot { slot_id: Uuid, at: DateTime<Utc> },
    /// Sets the claim flag to false unconditionally.
    ReleaseSlot { slot_id: Uuid, at: DateTime<Utc> },
    InsertBooking(Booking),
    /// Moves a booking confirmed -> cancelled. Requires status confirmed.
    CancelBooking { booking_id: Uuid, at: DateTime<Utc> },
}

impl LedgerWrite {
    pub fn target(&self) -> RecordRef {
        match self {
            LedgerWrite::InsertMentor(mentor) => RecordRef::Mentor(mentor.id),
            LedgerWrite::InsertSlot(slot) => RecordRef::Slot(slot.id),
            LedgerWrite::RescheduleSlot { slot_id, .. }
            | LedgerWrite::DeleteSlot { slot_id }
            | LedgerWrite::ClaimSlot { slot_id, .. }
            | LedgerWrite::ReleaseSlot { slot_id, .. } => RecordRef::Slot(*slot_id),
            LedgerWrite::InsertBooking(booking) => RecordRef::Booking(booking.id),
            LedgerWrite::CancelBooking { booking_id, .. } => RecordRef::Booking(*booking_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingParty {
    Student(String),
    Mentor(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingQuery {
    pub party: BookingParty,
    pub status: Option<BookingStatus>,
}

impl BookingQuery {
    pub fn matches(&self, booking: &Booking) -> bool {
        let party = match &self.party {
            BookingParty::Student(student_id) => booking.student_id == *student_id,
            BookingParty::Mentor(mentor_id) => booking.mentor_id == *mentor_id,
        };
        party && self.status.is_none_or(|status| booking.status == status)
    }
}

/// Record store used by the ledgers.
///
/// Reads are not required to be linearizable with in-flight transactions.
/// `transact` is the only synchronization point: a backend must apply the
/// whole batch or none of it, and report the first failing write.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get_mentor(&self, mentor_id: Uuid) -> Result<Option<Mentor>, StoreError>;

    async fn list_mentors(&self, status: Option<MentorStatus>) -> Result<Vec<Mentor>, StoreError>;

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError>;

    /// Slots of one mentor ordered by start time.
    async fn find_slots(
        &self,
        mentor_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<Slot>, StoreError>;

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// Bookings matching `query` ordered by session start.
    async fn find_bookings(&self, query: BookingQuery) -> Result<Vec<Booking>, StoreError>;

    async fn transact(&self, writes: Vec<LedgerWrite>) -> Result<(), StoreError>;
}

/// Runs a store call under an optional deadline. An elapsed deadline is an
/// infrastructure failure: the call either committed or it did not.
pub async fn with_deadline<T, F>(
    limit: Option<Duration>,
    operation: &str,
    fut: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
            StoreError::Unavailable(eyre::eyre!("{} timed out after {:?}", operation, limit))
        })?,
        None => fut.await,
    }
}
