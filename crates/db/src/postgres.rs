//! PostgreSQL implementation of [`DurableStore`].
//!
//! Every [`DurableStore::transact`] batch runs inside one database
//! transaction. Conditional writes are single `UPDATE`/`DELETE` statements
//! guarded by their precondition, so two racing batches serialize on the row
//! lock and the loser sees zero affected rows.

use async_trait::async_trait;
use slotsync_core::models::{
    booking::Booking,
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};
use slotsync_core::store::{
    BookingParty, BookingQuery, DurableStore, LedgerWrite, RecordRef, StoreError,
};
use sqlx::PgConnection;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::repositories::{booking, mentor, slot};
use crate::schema::ONE_CONFIRMED_BOOKING_PER_SLOT;
use crate::DbPool;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Sorts a database failure into the store's error vocabulary.
fn classify(err: eyre::Report, target: RecordRef) -> StoreError {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            StoreError::DuplicateKey(target)
        }
        _ => StoreError::Unavailable(err),
    }
}

/// A zero-row conditional write either hit a missing row or a row whose
/// precondition no longer holds.
async fn unmet(conn: &mut PgConnection, target: RecordRef) -> StoreError {
    let exists = match target {
        RecordRef::Slot(id) => slot::slot_exists(conn, id).await,
        RecordRef::Booking(id) => booking::booking_exists(conn, id).await,
        RecordRef::Mentor(_) => Ok(true),
    };

    match exists {
        Ok(true) => StoreError::ConditionFailed(target),
        Ok(false) => StoreError::MissingRecord(target),
        Err(err) => StoreError::Unavailable(err),
    }
}

async fn apply(conn: &mut PgConnection, write: LedgerWrite) -> Result<(), StoreError> {
    let target = write.target();

    let applied = match write {
        LedgerWrite::InsertMentor(record) => mentor::insert_mentor(conn, &record)
            .await
            .map(|_| true)
            .map_err(|err| classify(err, target))?,
        LedgerWrite::InsertSlot(record) => slot::insert_slot(conn, &record)
            .await
            .map(|_| true)
            .map_err(|err| classify(err, target))?,
        LedgerWrite::RescheduleSlot {
            slot_id,
            start_time,
            end_time,
            at,
        } => slot::reschedule_slot(conn, slot_id, start_time, end_time, at).await?,
        LedgerWrite::DeleteSlot { slot_id } => slot::delete_unclaimed_slot(conn, slot_id).await?,
        LedgerWrite::ClaimSlot { slot_id, at } => slot::claim_slot(conn, slot_id, at).await?,
        LedgerWrite::ReleaseSlot { slot_id, at } => slot::release_slot(conn, slot_id, at).await?,
        LedgerWrite::InsertBooking(record) => {
            // A second confirmed booking for the same slot trips the partial
            // unique index: that is a lost claim, not a key clash.
            match booking::insert_booking(conn, &record).await {
                Ok(()) => true,
                Err(err) if violates_one_confirmed_per_slot(&err) => {
                    return Err(StoreError::ConditionFailed(RecordRef::Slot(record.slot_id)));
                }
                Err(err) => return Err(classify(err, target)),
            }
        }
        LedgerWrite::CancelBooking { booking_id, at } => {
            booking::cancel_booking(conn, booking_id, at).await?
        }
    };

    if applied {
        Ok(())
    } else {
        Err(unmet(conn, target).await)
    }
}

fn violates_one_confirmed_per_slot(err: &eyre::Report) -> bool {
    match err.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db)) => {
            db.is_unique_violation() && db.constraint() == Some(ONE_CONFIRMED_BOOKING_PER_SLOT)
        }
        _ => false,
    }
}

#[async_trait]
impl DurableStore for PgStore {
    async fn get_mentor(&self, mentor_id: Uuid) -> Result<Option<Mentor>, StoreError> {
        let row = mentor::get_mentor_by_id(&self.pool, mentor_id).await?;
        Ok(row.map(Mentor::try_from).transpose()?)
    }

    async fn list_mentors(&self, status: Option<MentorStatus>) -> Result<Vec<Mentor>, StoreError> {
        let rows = mentor::list_mentors(&self.pool, status.as_ref().map(MentorStatus::as_str)).await?;
        Ok(rows
            .into_iter()
            .map(Mentor::try_from)
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        let row = slot::get_slot_by_id(&self.pool, slot_id).await?;
        Ok(row.map(Slot::from))
    }

    async fn find_slots(
        &self,
        mentor_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<Slot>, StoreError> {
        let rows = slot::get_slots_by_mentor_id(&self.pool, mentor_id, available_only).await?;
        Ok(rows.into_iter().map(Slot::from).collect())
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        let row = booking::get_booking_by_id(&self.pool, booking_id).await?;
        Ok(row.map(Booking::try_from).transpose()?)
    }

    async fn find_bookings(&self, query: BookingQuery) -> Result<Vec<Booking>, StoreError> {
        let status = query.status.as_ref().map(|status| status.as_str());
        let rows = match &query.party {
            BookingParty::Student(student_id) => {
                booking::get_bookings_by_student_id(&self.pool, student_id, status).await?
            }
            BookingParty::Mentor(mentor_id) => {
                booking::get_bookings_by_mentor_id(&self.pool, *mentor_id, status).await?
            }
        };

        Ok(rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<eyre::Result<Vec<_>>>()?)
    }

    async fn transact(&self, writes: Vec<LedgerWrite>) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        let count = writes.len();
        for write in writes {
            let target = write.target();
            if let Err(err) = apply(&mut tx, write).await {
                debug!(%target, error = %err, "Rolling back ledger transaction");
                if let Err(rollback) = tx.rollback().await {
                    warn!(error = %rollback, "Rollback failed, connection will be discarded");
                }
                return Err(err);
            }
        }

        tx.commit()
            .await
            .map_err(|err| StoreError::Unavailable(err.into()))?;

        debug!(writes = count, "Committed ledger transaction");
        Ok(())
    }
}
