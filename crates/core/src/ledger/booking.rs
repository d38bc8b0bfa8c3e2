use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::store::{BookingParty, BookingQuery, DurableStore, LedgerWrite, RecordRef, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled,
    /// The booking was no longer confirmed when the write committed.
    Conflict,
    NotFound,
}

/// Owns booking records and their confirmed -> cancelled lifecycle.
#[derive(Clone)]
pub struct BookingLedger {
    store: Arc<dyn DurableStore>,
}

impl BookingLedger {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        self.store.get_booking(booking_id).await
    }

    pub async fn find_by_student(
        &self,
        student_id: &str,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        self.store
            .find_bookings(BookingQuery {
                party: BookingParty::Student(student_id.to_string()),
                status,
            })
            .await
    }

    pub async fn find_by_mentor(
        &self,
        mentor_id: Uuid,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        self.store
            .find_bookings(BookingQuery {
                party: BookingParty::Mentor(mentor_id),
                status,
            })
            .await
    }

    pub fn insert_write(booking: Booking) -> LedgerWrite {
        LedgerWrite::InsertBooking(booking)
    }

    pub fn cancel_write(booking_id: Uuid, at: DateTime<Utc>) -> LedgerWrite {
        LedgerWrite::CancelBooking { booking_id, at }
    }

    /// Writes a new booking. Fails with `DuplicateKey` if the id is taken.
    pub async fn insert(&self, booking: Booking) -> Result<(), StoreError> {
        self.store.transact(vec![Self::insert_write(booking)]).await
    }

    pub async fn mark_cancelled(
        &self,
        booking_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<CancelOutcome, StoreError> {
        match self.store.transact(vec![Self::cancel_write(booking_id, at)]).await {
            Ok(()) => Ok(CancelOutcome::Cancelled),
            Err(StoreError::ConditionFailed(RecordRef::Booking(_))) => Ok(CancelOutcome::Conflict),
            Err(StoreError::MissingRecord(RecordRef::Booking(_))) => Ok(CancelOutcome::NotFound),
            Err(err) => Err(err),
        }
    }
}
