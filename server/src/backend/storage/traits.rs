//! # Storage Traits
//!
//! The source of record for bookings, seen from the domain layer. The
//! transition service only talks to storage through [`BookingStorage`], so a
//! remote REST client, the SQLite repository, or a test double can sit behind
//! it interchangeably.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage, StatusUpdate};
use crate::backend::domain::models::booking::{Booking, BookingId};
use crate::backend::domain::models::payment::PaymentRecord;

/// Result of asking the source of record to record a payment.
///
/// `Rejected` is a reported failure (the call went through and was refused);
/// transport-level problems surface as `Err` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum PaymentOutcome {
    Recorded {
        booking_id: BookingId,
        amount: Decimal,
        total_amount_paid: Decimal,
    },
    Rejected {
        status_code: u16,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatusUpdateOutcome {
    Updated {
        booking: Booking,
        message: Option<String>,
    },
    Rejected {
        status_code: u16,
        message: String,
    },
}

/// Trait defining the interface for booking storage operations
#[async_trait]
pub trait BookingStorage: Send + Sync {
    /// Retrieve a specific booking by ID
    async fn get_booking(&self, booking_id: BookingId) -> Result<Option<Booking>>;

    /// List one page of bookings, newest first
    async fn list_bookings(&self, query: &BookingListQuery) -> Result<BookingPage>;

    /// All bookings whose check-in date falls within `from..=to`
    async fn list_bookings_checking_in(&self, from: NaiveDate, to: NaiveDate)
        -> Result<Vec<Booking>>;

    /// Payments recorded against a booking, oldest first
    async fn list_payments(&self, booking_id: BookingId) -> Result<Vec<PaymentRecord>>;

    /// Record a payment against a booking, raising its cumulative amount paid
    async fn record_payment(&self, booking_id: BookingId, amount: Decimal)
        -> Result<PaymentOutcome>;

    /// Write a new status, optionally with reason, down payment and release
    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusUpdateOutcome>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for creating repositories so the wiring code does
/// not depend on the concrete backend.
pub trait Connection: Send + Sync + Clone {
    /// The type of BookingStorage this connection creates
    type BookingRepository: BookingStorage + Clone;

    /// Create a new booking repository for this connection
    fn create_booking_repository(&self) -> Self::BookingRepository;
}
