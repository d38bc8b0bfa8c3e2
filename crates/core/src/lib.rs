//! # SlotSync Core
//!
//! Domain types and the reservation logic for mentor availability slots.
//!
//! - [`coordinator`]: `reserve` / `release`, the atomic slot + booking transitions
//! - [`ledger`]: slot and booking primitives over the store
//! - [`store`]: the [`store::DurableStore`] contract and an in-memory backend
//! - [`catalog`] and [`directory`]: mentor-facing slot and profile management

pub mod catalog;
pub mod coordinator;
pub mod directory;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod store;
