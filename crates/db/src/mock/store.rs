use async_trait::async_trait;
use mockall::mock;
use slotsync_core::models::{
    booking::Booking,
    mentor::{Mentor, MentorStatus},
    slot::Slot,
};
use slotsync_core::store::{BookingQuery, DurableStore, LedgerWrite, StoreError};
use uuid::Uuid;

// Scriptable store for driving failure paths without a database
mock! {
    pub Store {}

    #[async_trait]
    impl DurableStore for Store {
        async fn get_mentor(&self, mentor_id: Uuid) -> Result<Option<Mentor>, StoreError>;

        async fn list_mentors(
            &self,
            status: Option<MentorStatus>,
        ) -> Result<Vec<Mentor>, StoreError>;

        async fn get_slot(&self, slot_id: Uuid) -> Result<Option<Slot>, StoreError>;

        async fn find_slots(
            &self,
            mentor_id: Uuid,
            available_only: bool,
        ) -> Result<Vec<Slot>, StoreError>;

        async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, StoreError>;

        async fn find_bookings(&self, query: BookingQuery) -> Result<Vec<Booking>, StoreError>;

        async fn transact(&self, writes: Vec<LedgerWrite>) -> Result<(), StoreError>;
    }
}
