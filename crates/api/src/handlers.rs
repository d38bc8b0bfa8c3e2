/// Reservation and cancellation endpoints
pub mod booking;
/// Mentor profile endpoints
pub mod mentor;
/// Slot publishing endpoints
pub mod slot;
