//! # Storage Module
//!
//! Handles persistence for the booking console: bookings, the payments
//! recorded against them, and the availability of the rooms and areas they
//! hold.
//!
//! The domain layer only sees the [`BookingStorage`] trait. The SQLite
//! implementation here plays the part of the booking backend's source of
//! record; a remote client could be swapped in without touching the domain.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite database with SQLx
//! - **Amounts**: Stored as decimal text, read back as `rust_decimal::Decimal`
//! - **Atomicity**: Payment and status writes each run in one transaction

pub mod connection;
pub mod repositories;
pub mod traits;

#[cfg(test)]
pub mod test_utils;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::BookingRepository;
pub use traits::{BookingStorage, Connection, PaymentOutcome, StatusUpdateOutcome};
