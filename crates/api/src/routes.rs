pub mod booking;
pub mod health;
pub mod mentor;
pub mod slot;
