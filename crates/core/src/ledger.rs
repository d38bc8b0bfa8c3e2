//! Typed views over the [`DurableStore`](crate::store::DurableStore).
//!
//! Each ledger exposes its primitives twice: as a standalone call that runs a
//! single-write transaction, and as a [`LedgerWrite`](crate::store::LedgerWrite)
//! builder the coordinator composes into a multi-record batch.

pub mod booking;
pub mod slot;

pub use booking::{BookingLedger, CancelOutcome};
pub use slot::{ClaimOutcome, ReleaseOutcome, SlotLedger};
