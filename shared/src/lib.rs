use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a booking as exchanged with clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
    Rejected,
    NoShow,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 7] = [
        BookingStatus::Pending,
        BookingStatus::Reserved,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
        BookingStatus::Cancelled,
        BookingStatus::Rejected,
        BookingStatus::NoShow,
    ];

    /// Wire representation, e.g. `checked_in`
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Reserved => "reserved",
            BookingStatus::CheckedIn => "checked_in",
            BookingStatus::CheckedOut => "checked_out",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
            BookingStatus::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = BookingStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| BookingStatusParseError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookingStatusParseError(pub String);

impl fmt::Display for BookingStatusParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown booking status: {}", self.0)
    }
}

impl std::error::Error for BookingStatusParseError {}

/// Guest who made the booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub name: String,
    pub email: String,
    pub is_verified: bool,
}

/// Room payload of a room booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: i64,
    pub name: String,
    pub discounted_price: Option<Decimal>,
}

/// Area payload of a venue booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSummary {
    pub id: i64,
    pub name: String,
    pub discounted_price: Option<Decimal>,
}

/// A booking as returned by the API.
///
/// Exactly one of `room` / `area` is set, matching `is_venue_booking`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub down_payment: Option<Decimal>,
    pub total_amount_paid: Decimal,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub is_venue_booking: bool,
    pub room: Option<RoomSummary>,
    pub area: Option<AreaSummary>,
    pub user: Guest,
    pub reason: Option<String>,
    /// Statuses this booking can move to next; empty once terminal
    #[serde(default)]
    pub allowed_transitions: Vec<BookingStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingKind {
    Room,
    Area,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingListRequest {
    pub status: Option<BookingStatus>,
    pub kind: Option<BookingKind>,
    /// Case-insensitive match against guest name or email
    pub search: Option<String>,
    /// 1-based page number
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: u32,
    pub page_size: u32,
    pub has_more: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingListResponse {
    pub bookings: Vec<Booking>,
    pub pagination: PaginationInfo,
}

/// Request to move a booking to another status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub target_status: BookingStatus,
    /// Amount exactly as entered by staff, e.g. "₱1,500.00"
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub release_availability: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionResponse {
    pub booking: Booking,
    pub success_message: String,
}

/// Payment position of a single booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummaryResponse {
    pub booking_id: i64,
    pub total_price: Decimal,
    pub required_down_payment: Decimal,
    pub down_payment: Option<Decimal>,
    pub total_amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub is_fully_paid: bool,
    pub formatted_remaining_balance: String,
}

/// One payment recorded against a booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    pub amount: Decimal,
    pub formatted_amount: String,
    pub recorded_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryResponse {
    pub booking_id: i64,
    pub payments: Vec<PaymentRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummaryResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub booking_count: u32,
    pub collected_revenue: Decimal,
    pub outstanding_balance: Decimal,
    pub room_revenue: Decimal,
    pub area_revenue: Decimal,
    pub status_counts: Vec<StatusCount>,
}
