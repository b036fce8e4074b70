//! Domain model for the revenue overview.
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::booking::BookingStatus;

#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub booking_count: u32,
    /// Sum of everything recorded as paid
    pub collected_revenue: Decimal,
    /// Still owed on bookings that are not terminal
    pub outstanding_balance: Decimal,
    pub room_revenue: Decimal,
    pub area_revenue: Decimal,
    /// One entry per status, in [`BookingStatus::ALL`] order
    pub status_counts: Vec<(BookingStatus, u32)>,
}
