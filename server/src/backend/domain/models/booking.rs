//! Domain model for a booking and its lifecycle status.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;

pub type BookingId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
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

    /// Storage representation
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

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == value)
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::CheckedOut
                | BookingStatus::Cancelled
                | BookingStatus::Rejected
                | BookingStatus::NoShow
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Room,
    Area,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Room => "room",
            ResourceKind::Area => "area",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "room" => Some(ResourceKind::Room),
            "area" => Some(ResourceKind::Area),
            _ => None,
        }
    }
}

/// The room or area a booking holds. A booking never holds both.
#[derive(Debug, Clone, PartialEq)]
pub struct BookedResource {
    pub kind: ResourceKind,
    pub id: i64,
    pub name: String,
    pub discounted_price: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guest {
    pub name: String,
    pub email: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub id: BookingId,
    pub status: BookingStatus,
    pub total_price: Decimal,
    pub down_payment: Option<Decimal>,
    pub total_amount_paid: Decimal,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub resource: BookedResource,
    pub guest: Guest,
    pub reason: Option<String>,
}

impl Booking {
    pub fn is_venue_booking(&self) -> bool {
        self.resource.kind == ResourceKind::Area
    }

    /// Amount counted against the total price. Bookings reserved before any
    /// payment was recorded only carry the down payment.
    pub fn amount_already_paid(&self) -> Decimal {
        let down_payment = self.down_payment.unwrap_or(Decimal::ZERO);
        self.total_amount_paid.max(down_payment)
    }

    /// Copy the fields a status transition can change from `other`.
    pub fn merge_lifecycle_fields(&mut self, other: &Booking) {
        self.status = other.status;
        self.down_payment = other.down_payment;
        self.total_amount_paid = other.total_amount_paid;
        self.reason = other.reason.clone();
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::room_booking;
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_parse_matches_as_str() {
        for status in BookingStatus::ALL {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(BookingStatus::parse("archived"), None);
    }

    #[test]
    fn test_terminal_statuses() {
        let terminal: Vec<_> = BookingStatus::ALL
            .into_iter()
            .filter(BookingStatus::is_terminal)
            .collect();
        assert_eq!(
            terminal,
            vec![
                BookingStatus::CheckedOut,
                BookingStatus::Cancelled,
                BookingStatus::Rejected,
                BookingStatus::NoShow
            ]
        );
    }

    #[test]
    fn test_amount_already_paid_falls_back_to_down_payment() {
        let mut booking = room_booking(1, BookingStatus::Reserved, dec!(1000));
        booking.down_payment = Some(dec!(600));
        assert_eq!(booking.amount_already_paid(), dec!(600));

        booking.total_amount_paid = dec!(800);
        assert_eq!(booking.amount_already_paid(), dec!(800));
    }

    #[test]
    fn test_merge_lifecycle_fields_keeps_identity() {
        let mut cached = room_booking(4, BookingStatus::Pending, dec!(500));
        let mut fresh = room_booking(4, BookingStatus::Reserved, dec!(500));
        fresh.down_payment = Some(dec!(250));
        fresh.total_amount_paid = dec!(250);
        fresh.guest.name = "Someone Else".to_string();

        cached.merge_lifecycle_fields(&fresh);

        assert_eq!(cached.status, BookingStatus::Reserved);
        assert_eq!(cached.down_payment, Some(dec!(250)));
        assert_eq!(cached.total_amount_paid, dec!(250));
        assert_eq!(cached.guest.name, "Guest 4");
    }
}
