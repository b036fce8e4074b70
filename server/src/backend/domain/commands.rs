//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod bookings {
    use crate::backend::domain::models::booking::{
        Booking, BookingId, BookingStatus, ResourceKind,
    };
    use rust_decimal::Decimal;

    pub const DEFAULT_PAGE_SIZE: u32 = 20;
    pub const MAX_PAGE_SIZE: u32 = 100;

    /// Filter and page for listing bookings.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct BookingListQuery {
        pub status: Option<BookingStatus>,
        pub kind: Option<ResourceKind>,
        pub search: Option<String>,
        /// 1-based
        pub page: u32,
        pub page_size: u32,
    }

    impl Default for BookingListQuery {
        fn default() -> Self {
            Self {
                status: None,
                kind: None,
                search: None,
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
            }
        }
    }

    impl BookingListQuery {
        /// Clamp page and page size into the supported range.
        pub fn normalized(mut self) -> Self {
            self.page = self.page.max(1);
            self.page_size = self.page_size.clamp(1, MAX_PAGE_SIZE);
            self.search = self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty());
            self
        }

        pub fn offset(&self) -> u32 {
            (self.page.saturating_sub(1)).saturating_mul(self.page_size)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct BookingPage {
        pub bookings: Vec<Booking>,
        pub page: u32,
        pub page_size: u32,
        pub has_more: bool,
    }

    /// Input for moving a booking to another status.
    #[derive(Debug, Clone, PartialEq)]
    pub struct TransitionCommand {
        pub booking_id: BookingId,
        pub target_status: BookingStatus,
        pub entered_amount: Option<Decimal>,
        pub reason: Option<String>,
        /// Defaults to the transition's own release behaviour when unset
        pub release_availability: Option<bool>,
    }

    impl TransitionCommand {
        pub fn new(booking_id: BookingId, target_status: BookingStatus) -> Self {
            Self {
                booking_id,
                target_status,
                entered_amount: None,
                reason: None,
                release_availability: None,
            }
        }

        pub fn with_amount(mut self, amount: Decimal) -> Self {
            self.entered_amount = Some(amount);
            self
        }

        pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
            self.reason = Some(reason.into());
            self
        }

        pub fn with_release_availability(mut self, release: bool) -> Self {
            self.release_availability = Some(release);
            self
        }
    }

    /// Status write sent to the source of record.
    ///
    /// Applied only while the stored status still equals `from`.
    #[derive(Debug, Clone, PartialEq)]
    pub struct StatusUpdate {
        pub booking_id: BookingId,
        pub from: BookingStatus,
        pub status: BookingStatus,
        pub reason: Option<String>,
        pub down_payment: Option<Decimal>,
        pub release_availability: bool,
    }
}

pub mod analytics {
    use chrono::NaiveDate;

    /// Date range, inclusive on both ends, matched against check-in dates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RevenueQuery {
        pub from: NaiveDate,
        pub to: NaiveDate,
    }
}
