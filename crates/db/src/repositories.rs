//! Query functions over the `mentors`, `slots` and `bookings` tables.
//!
//! Reads run against the pool. Writes take a connection so that
//! [`crate::PgStore`] can run several of them inside one transaction.

pub mod booking;
pub mod mentor;
pub mod slot;
