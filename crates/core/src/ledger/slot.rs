use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::slot::Slot;
use crate::store::{DurableStore, LedgerWrite, RecordRef, StoreError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// The claim flag was already set when the write committed.
    Conflict,
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    Released,
    NotFound,
}

/// Owns slot records and their claim flag.
#[derive(Clone)]
pub struct SlotLedger {
    store: Arc<dyn DurableStore>,
}

impl SlotLedger {
    pub fn new(store: Arc<dyn DurableStore>) -> Self {
        Self { store }
    }

    pub async fn get(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError> {
        self.store.get_slot(slot_id).await
    }

    pub async fn find_by_mentor(
        &self,
        mentor_id: Uuid,
        available_only: bool,
    ) -> Result<Vec<Slot>, StoreError> {
        self.store.find_slots(mentor_id, available_only).await
    }

    pub fn claim_write(slot_id: Uuid, at: DateTime<Utc>) -> LedgerWrite {
        LedgerWrite::ClaimSlot { slot_id, at }
    }

    pub fn release_write(slot_id: Uuid, at: DateTime<Utc>) -> LedgerWrite {
        LedgerWrite::ReleaseSlot { slot_id, at }
    }

    /// Conditionally flips the claim flag false -> true on its own.
    pub async fn claim(&self, slot_id: Uuid, at: DateTime<Utc>) -> Result<ClaimOutcome, StoreError> {
        match self.store.transact(vec![Self::claim_write(slot_id, at)]).await {
            Ok(()) => Ok(ClaimOutcome::Claimed),
            Err(StoreError::ConditionFailed(RecordRef::Slot(_))) => Ok(ClaimOutcome::Conflict),
            Err(StoreError::MissingRecord(RecordRef::Slot(_))) => Ok(ClaimOutcome::NotFound),
            Err(err) => Err(err),
        }
    }

    pub async fn release(
        &self,
        slot_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<ReleaseOutcome, StoreError> {
        match self.store.transact(vec![Self::release_write(slot_id, at)]).await {
            Ok(()) => Ok(ReleaseOutcome::Released),
            Err(StoreError::MissingRecord(RecordRef::Slot(_))) => Ok(ReleaseOutcome::NotFound),
            Err(err) => Err(err),
        }
    }
}
