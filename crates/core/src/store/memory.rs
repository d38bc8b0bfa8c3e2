//! In-process [`DurableStore`] backend.
//!
//! Transactions run under a single write lock. Each write is applied in
//! order and its previous value recorded in an undo journal; the first
//! failing write rolls the journal back, so a batch is all-or-nothing.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;
use uuid::Uuid;

use super::{BookingQuery, DurableStore, LedgerWrite, RecordRef, StoreError};
use crate::models::{
    booking::{Booking, BookingStatus},
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};

#[derive(Debug, Default)]
struct Tables {
    mentors: HashMap<Uuid, Mentor>,
    slots: HashMap<Uuid, Slot>,
    bookings: HashMap<Uuid, Booking>,
}

/// Prior state of a record touched by an in-flight batch.
enum Undo {
    Mentor(Uuid, Option<Mentor>),
    Slot(Uuid, Option<Slot>),
    Booking(Uuid, Option<Booking>),
}

impl Tables {
    fn apply(&mut self, write: LedgerWrite, journal: &mut Vec<Undo>) -> Result<(), StoreError> {
        let target = write.target();

        match write {
            LedgerWrite::InsertMentor(mentor) => {
                if self.mentors.contains_key(&mentor.id) {
                    return Err(StoreError::DuplicateKey(target));
                }
                journal.push(Undo::Mentor(mentor.id, None));
                self.mentors.insert(mentor.id, mentor);
            }
            LedgerWrite::InsertSlot(slot) => {
                if self.slots.contains_key(&slot.id) {
                    return Err(StoreError::DuplicateKey(target));
                }
                journal.push(Undo::Slot(slot.id, None));
                self.slots.insert(slot.id, slot);
            }
            LedgerWrite::RescheduleSlot {
                slot_id,
                start_time,
                end_time,
                at,
            } => {
                let slot = self.unclaimed_slot(slot_id, target)?;
                journal.push(Undo::Slot(slot_id, Some(slot.clone())));
                slot.start_time = start_time;
                slot.end_time = end_time;
                slot.updated_at = at;
            }
            LedgerWrite::DeleteSlot { slot_id } => {
                self.unclaimed_slot(slot_id, target)?;
                let previous = self.slots.remove(&slot_id);
                journal.push(Undo::Slot(slot_id, previous));
            }
            LedgerWrite::ClaimSlot { slot_id, at } => {
                let slot = self.unclaimed_slot(slot_id, target)?;
                journal.push(Undo::Slot(slot_id, Some(slot.clone())));
                slot.is_booked = true;
                slot.updated_at = at;
            }
            LedgerWrite::ReleaseSlot { slot_id, at } => {
                let slot = self
                    .slots
                    .get_mut(&slot_id)
                    .ok_or(StoreError::MissingRecord(target))?;
                journal.push(Undo::Slot(slot_id, Some(slot.clone())));
                slot.is_booked = false;
                slot.updated_at = at;
            }
            LedgerWrite::InsertBooking(booking) => {
                if self.bookings.contains_key(&booking.id) {
                    return Err(StoreError::DuplicateKey(target));
                }
                journal.push(Undo::Booking(booking.id, None));
                self.bookings.insert(booking.id, booking);
            }
            LedgerWrite::CancelBooking { booking_id, at } => {
                let booking = self
                    .bookings
                    .get_mut(&booking_id)
                    .ok_or(StoreError::MissingRecord(target))?;
                if booking.status != BookingStatus::Confirmed {
                    return Err(StoreError::ConditionFailed(target));
                }
                journal.push(Undo::Booking(booking_id, Some(booking.clone())));
                booking.status = BookingStatus::Cancelled;
                booking.cancelled_at = Some(at);
                booking.updated_at = at;
            }
        }

        Ok(())
    }

    fn unclaimed_slot(&mut self, slot_id: Uuid, target: RecordRef) -> Result<&mut Slot, StoreError> {
        let slot = self
            .slots
            .get_mut(&slot_id)
            .ok_or(StoreError::MissingRecord(target))?;
        if slot.is_booked {
            return Err(StoreError::ConditionFailed(target));
        }
        Ok(slot)
    }

    fn rollback(&mut self, journal: Vec<Undo>) {
        for undo in journal.into_iter().rev() {
            match undo {
                Undo::Mentor(id, Some(previous)) => {
                    self.mentors.insert(id, previous);
                }
                Undo::Mentor(id, None) => {
                    self.mentors.remove(&id);
                }
                Undo::Slot(id, Some(previous)) => {
                    self.slots.insert(id, previous);
                }
                Undo::Slot(id, None) => {
                    self.slots.remove(&id);
                }
                Undo::Booking(id, Some(previous)) => {
                    self.bookings.insert(id, previous);
                }
                Undo::Booking(id, None) => {
                    self.bookings.remove(&id);
                }
            }
        }
    }
}

/// Non-persistent store with the same commit semantics as the Postgres
/// backend. Used by tests and by the `memory` server backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    async fn get_mentor(&self, mentor_id: Uuid) -> Result<Option<Mentor>, StoreError> {
        Ok(self.tables.read().await.mentors.get(&mentor_id).cloned())
    }

    async fn list_mentors(&self, status: Option<MentorStatus>) -> Result<Vec<Mentor>, StoreError> {
        let tables = self.tables.read().await;
        let mut mentors: Vec<Mentor> = tables
            .mentors
            .values()
            .filter(|mentor| status.is_none_or(|status| mentor.status == status))
            .cloned()
            .collect();
        mentors.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(mentors)
    }

    async fn get_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        Ok(self.tables.read().await.slots.get(&slot_id).cloned())
    }

    async fn find_slots(
        &self,
        mentor_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<Slot>, StoreError> {
        let tables = self.tables.read().await;
        let mut slots: Vec<Slot> = tables
            .slots
            .values()
            .filter(|slot| slot.mentor_id == mentor_id && !(available_only && slot.is_booked))
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(slots)
    }

    async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.tables.read().await.bookings.get(&booking_id).cloned())
    }

    async fn find_bookings(&self, query: BookingQuery) -> Result<Vec<Booking>, StoreError> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .values()
            .filter(|booking| query.matches(booking))
            .cloned()
            .collect();
        bookings.sort_by(|a, b| a.session_start.cmp(&b.session_start));
        Ok(bookings)
    }

    async fn transact(&self, writes: Vec<LedgerWrite>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let mut journal = Vec::with_capacity(writes.len());

        for write in writes {
            if let Err(err) = tables.apply(write, &mut journal) {
                trace!(error = %err, undone = journal.len(), "rolling back batch");
                tables.rollback(journal);
                return Err(err);
            }
        }

        Ok(())
    }
}
