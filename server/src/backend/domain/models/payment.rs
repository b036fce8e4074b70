//! Domain model for a recorded payment.
use rust_decimal::Decimal;

use super::booking::BookingId;

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub id: i64,
    pub booking_id: BookingId,
    pub amount: Decimal,
    /// SQLite `CURRENT_TIMESTAMP`, UTC
    pub recorded_at: String,
}
