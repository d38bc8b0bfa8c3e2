//! Mentor-side slot management: publishing, rescheduling and withdrawing
//! availability windows. Nothing here touches the claim flag; rescheduling
//! and withdrawal are conditional on the slot being unclaimed at commit.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::coordinator::resolve;
use crate::errors::{SyncError, SyncResult};
use crate::ledger::SlotLedger;
use crate::models::slot::{Slot, validate_window};
use crate::store::{DurableStore, LedgerWrite, RecordRef, StoreError, with_deadline};

#[derive(Clone)]
pub struct SlotCatalog {
    store: Arc<dyn DurableStore>,
    slots: SlotLedger,
    store_timeout: Option<Duration>,
}

impl SlotCatalog {
    pub fn new(store: Arc<dyn DurableStore>, store_timeout: Option<Duration>) -> Self {
        Self {
            slots: SlotLedger::new(store.clone()),
            store,
            store_timeout,
        }
    }

    pub async fn create_slot(
        &self,
        mentor_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> SyncResult<Slot> {
        let slot = Slot::new(mentor_id, start_time, end_time, Utc::now())?;

        with_deadline(self.store_timeout, "read mentor", self.store.get_mentor(mentor_id))
            .await
            .map_err(|err| resolve("create_slot", err))?
            .ok_or_else(|| SyncError::NotFound(format!("Mentor with ID {} not found", mentor_id)))?;

        with_deadline(
            self.store_timeout,
            "insert slot",
            self.store.transact(vec![LedgerWrite::InsertSlot(slot.clone())]),
        )
        .await
        .map_err(|err| resolve("create_slot", err))?;

        info!(slot_id = %slot.id, %mentor_id, "slot published");
        Ok(slot)
    }

    pub async fn get_slot(&self, slot_id: Uuid) -> SyncResult<Option<Slot>> {
        with_deadline(self.store_timeout, "read slot", self.slots.get(slot_id))
            .await
            .map_err(|err| resolve("get_slot", err))
    }

    pub async fn mentor_slots(&self, mentor_id: Uuid, available_only: bool) -> SyncResult<Vec<Slot>> {
        with_deadline(
            self.store_timeout,
            "list slots",
            self.slots.find_by_mentor(mentor_id, available_only),
        )
        .await
        .map_err(|err| resolve("mentor_slots", err))
    }

    /// Moves an unclaimed slot owned by `mentor_id`. Omitted bounds keep
    /// their current value.
    pub async fn reschedule_slot(
        &self,
        slot_id: Uuid,
        mentor_id: Uuid,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> SyncResult<Slot> {
        let slot = self.owned_slot(slot_id, mentor_id).await?;
        if slot.is_booked {
            return Err(SyncError::Conflict(
                "Cannot reschedule a booked time slot".to_string(),
            ));
        }

        let start_time = start_time.unwrap_or(slot.start_time);
        let end_time = end_time.unwrap_or(slot.end_time);
        validate_window(start_time, end_time)?;

        let now = Utc::now();
        let write = LedgerWrite::RescheduleSlot {
            slot_id,
            start_time,
            end_time,
            at: now,
        };

        self.commit_unclaimed("reschedule_slot", slot_id, write).await?;

        info!(%slot_id, "slot rescheduled");
        Ok(Slot {
            start_time,
            end_time,
            updated_at: now,
            ..slot
        })
    }

    /// Deletes an unclaimed slot owned by `mentor_id`.
    pub async fn withdraw_slot(&self, slot_id: Uuid, mentor_id: Uuid) -> SyncResult<()> {
        let slot = self.owned_slot(slot_id, mentor_id).await?;
        if slot.is_booked {
            return Err(SyncError::Conflict(
                "Cannot delete a booked time slot".to_string(),
            ));
        }

        self.commit_unclaimed("withdraw_slot", slot_id, LedgerWrite::DeleteSlot { slot_id })
            .await?;

        info!(%slot_id, "slot withdrawn");
        Ok(())
    }

    async fn owned_slot(&self, slot_id: Uuid, mentor_id: Uuid) -> SyncResult<Slot> {
        let slot = self
            .get_slot(slot_id)
            .await?
            .ok_or(SyncError::SlotNotFound(slot_id))?;

        if slot.mentor_id != mentor_id {
            return Err(SyncError::Unauthorized("Not your time slot".to_string()));
        }
        Ok(slot)
    }

    async fn commit_unclaimed(
        &self,
        operation: &str,
        slot_id: Uuid,
        write: LedgerWrite,
    ) -> SyncResult<()> {
        match with_deadline(self.store_timeout, operation, self.store.transact(vec![write])).await {
            Ok(()) => Ok(()),
            Err(StoreError::ConditionFailed(RecordRef::Slot(_))) => Err(SyncError::Conflict(
                format!("Time slot {} was booked concurrently", slot_id),
            )),
            Err(err) => Err(resolve(operation, err)),
        }
    }
}
