//! # Reservation Coordinator
//!
//! Orchestrates the [`SlotLedger`] and [`BookingLedger`] so that a slot is
//! held by at most one confirmed booking at a time.
//!
//! `reserve` inserts the booking and conditionally claims the slot in one
//! store transaction; `release` conditionally cancels the booking and frees
//! the slot in one store transaction. The conditional writes are the only
//! synchronization: the coordinator keeps no locks and no per-slot state, so
//! any number of instances may run against the same store.
//!
//! The unclaimed pre-check in `reserve` only saves a doomed transaction. It
//! can be switched off through [`CoordinatorConfig::precheck`] without
//! affecting mutual exclusion.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{SyncError, SyncResult};
use crate::ledger::{BookingLedger, SlotLedger};
use crate::models::booking::{Booking, BookingStatus};
use crate::store::{DurableStore, RecordRef, StoreError, with_deadline};

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Reject reservations of slots already observed as claimed before
    /// submitting the transaction.
    pub precheck: bool,

    /// Upper bound for each store round trip.
    pub store_timeout: Option<Duration>,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            precheck: true,
            store_timeout: Some(Duration::from_secs(5)),
        }
    }
}

#[derive(Clone)]
pub struct ReservationCoordinator {
    store: Arc<dyn DurableStore>,
    slots: SlotLedger,
    bookings: BookingLedger,
    config: CoordinatorConfig,
}

impl ReservationCoordinator {
    pub fn new(store: Arc<dyn DurableStore>, config: CoordinatorConfig) -> Self {
        Self {
            slots: SlotLedger::new(store.clone()),
            bookings: BookingLedger::new(store.clone()),
            store,
            config,
        }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Reserves `slot_id` for `student_id` and returns the stored booking.
    ///
    /// # Errors
    ///
    /// * `SyncError::Invalid` - blank student id
    /// * `SyncError::SlotNotFound` - no such slot, at read or at commit
    /// * `SyncError::SlotAlreadyClaimed` - the slot is held by another booking
    /// * `SyncError::Unavailable` - the store failed or timed out; safe to retry
    pub async fn reserve(&self, student_id: &str, slot_id: Uuid) -> SyncResult<Booking> {
        if student_id.trim().is_empty() {
            return Err(SyncError::Invalid("Student ID is required".to_string()));
        }

        let now = Utc::now();

        let slot = self
            .bounded("read slot", self.slots.get(slot_id))
            .await
            .map_err(|err| resolve("reserve", err))?
            .ok_or(SyncError::SlotNotFound(slot_id))?;

        if self.config.precheck && slot.is_booked {
            debug!(%slot_id, "slot observed as claimed, skipping transaction");
            return Err(SyncError::SlotAlreadyClaimed(slot_id));
        }

        let booking = Booking::confirmed(student_id, &slot, now);
        let writes = vec![
            BookingLedger::insert_write(booking.clone()),
            SlotLedger::claim_write(slot_id, now),
        ];

        match self
            .bounded("commit reservation", self.store.transact(writes))
            .await
        {
            Ok(()) => {
                info!(booking_id = %booking.id, %slot_id, student_id, "booking confirmed");
                Ok(booking)
            }
            Err(StoreError::ConditionFailed(RecordRef::Slot(_))) => {
                debug!(%slot_id, student_id, "lost claim race");
                Err(SyncError::SlotAlreadyClaimed(slot_id))
            }
            Err(StoreError::MissingRecord(RecordRef::Slot(_))) => {
                debug!(%slot_id, "slot withdrawn before commit");
                Err(SyncError::SlotNotFound(slot_id))
            }
            Err(err) => Err(resolve("reserve", err)),
        }
    }

    /// Cancels a confirmed booking and frees its slot.
    ///
    /// `requesting_student_id` of `None` marks a trusted internal caller and
    /// skips the ownership check.
    ///
    /// # Errors
    ///
    /// * `SyncError::BookingNotFound` - no such booking
    /// * `SyncError::Unauthorized` - the requester does not own the booking
    /// * `SyncError::AlreadyCancelled` - cancelled before or concurrently
    /// * `SyncError::Unavailable` - the store failed or timed out; safe to retry
    pub async fn release(
        &self,
        booking_id: Uuid,
        requesting_student_id: Option<&str>,
    ) -> SyncResult<()> {
        let booking = self
            .bounded("read booking", self.bookings.get(booking_id))
            .await
            .map_err(|err| resolve("release", err))?
            .ok_or(SyncError::BookingNotFound(booking_id))?;

        if let Some(requester) = requesting_student_id
            && !booking.is_owned_by(requester)
        {
            debug!(%booking_id, requester, "cancellation by non-owner refused");
            return Err(SyncError::Unauthorized(
                "You can only cancel your own bookings".to_string(),
            ));
        }

        if !booking.is_confirmed() {
            return Err(SyncError::AlreadyCancelled(booking_id));
        }

        let now = Utc::now();
        let writes = vec![
            BookingLedger::cancel_write(booking_id, now),
            SlotLedger::release_write(booking.slot_id, now),
        ];

        match self
            .bounded("commit cancellation", self.store.transact(writes))
            .await
        {
            Ok(()) => {
                info!(%booking_id, slot_id = %booking.slot_id, "booking cancelled");
                Ok(())
            }
            Err(StoreError::ConditionFailed(RecordRef::Booking(_))) => {
                debug!(%booking_id, "lost cancellation race");
                Err(SyncError::AlreadyCancelled(booking_id))
            }
            Err(StoreError::MissingRecord(RecordRef::Booking(_))) => {
                Err(SyncError::BookingNotFound(booking_id))
            }
            Err(StoreError::MissingRecord(RecordRef::Slot(slot_id))) => {
                warn!(%booking_id, %slot_id, "confirmed booking references a missing slot");
                Err(SyncError::SlotNotFound(slot_id))
            }
            Err(err) => Err(resolve("release", err)),
        }
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> SyncResult<Option<Booking>> {
        self.bounded("read booking", self.bookings.get(booking_id))
            .await
            .map_err(|err| resolve("get_booking", err))
    }

    pub async fn bookings_for_student(
        &self,
        student_id: &str,
        status: Option<BookingStatus>,
    ) -> SyncResult<Vec<Booking>> {
        if student_id.trim().is_empty() {
            return Err(SyncError::Invalid("Student ID is required".to_string()));
        }

        self.bounded(
            "list student bookings",
            self.bookings.find_by_student(student_id, status),
        )
        .await
        .map_err(|err| resolve("bookings_for_student", err))
    }

    pub async fn bookings_for_mentor(
        &self,
        mentor_id: Uuid,
        status: Option<BookingStatus>,
    ) -> SyncResult<Vec<Booking>> {
        self.bounded(
            "list mentor bookings",
            self.bookings.find_by_mentor(mentor_id, status),
        )
        .await
        .map_err(|err| resolve("bookings_for_mentor", err))
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        with_deadline(self.config.store_timeout, operation, fut).await
    }
}

/// Translates a store failure the caller did not handle itself. Infrastructure
/// failures are logged; business outcomes pass through quietly.
pub(crate) fn resolve(operation: &str, err: StoreError) -> SyncError {
    let err = SyncError::from(err);
    if err.is_retryable() {
        warn!(operation, error = %err, "store failure");
    }
    err
}
