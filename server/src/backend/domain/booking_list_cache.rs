//! Last-known page of bookings for the current filter.
//!
//! The page is replaced wholesale only by an explicit refresh or page change.
//! Transitions merge their result into the matching entry instead, so the list
//! does not flicker after every status change.

use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage};
use crate::backend::domain::models::booking::{Booking, BookingId};

#[derive(Debug, Clone, Default)]
pub struct BookingListCache {
    query: Option<BookingListQuery>,
    bookings: Vec<Booking>,
}

impl BookingListCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached page with a freshly fetched one.
    pub fn replace(&mut self, query: BookingListQuery, page: BookingPage) {
        self.query = Some(query);
        self.bookings = page.bookings;
    }

    /// Update the lifecycle fields of the entry with the same id.
    ///
    /// Returns false when the booking is not on the cached page.
    pub fn merge(&mut self, updated: &Booking) -> bool {
        match self.bookings.iter_mut().find(|b| b.id == updated.id) {
            Some(entry) => {
                entry.merge_lifecycle_fields(updated);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|b| b.id == id)
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn query(&self) -> Option<&BookingListQuery> {
        self.query.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::booking::{fixtures::room_booking, BookingStatus};
    use rust_decimal_macros::dec;

    fn page_of(bookings: Vec<Booking>) -> BookingPage {
        BookingPage {
            bookings,
            page: 1,
            page_size: 20,
            has_more: false,
        }
    }

    #[test]
    fn test_merge_updates_only_matching_entry() {
        let mut cache = BookingListCache::new();
        cache.replace(
            BookingListQuery::default(),
            page_of(vec![
                room_booking(1, BookingStatus::Pending, dec!(1000)),
                room_booking(2, BookingStatus::Pending, dec!(800)),
            ]),
        );

        let mut updated = room_booking(2, BookingStatus::Reserved, dec!(800));
        updated.down_payment = Some(dec!(400));
        updated.total_amount_paid = dec!(400);

        assert!(cache.merge(&updated));
        assert_eq!(cache.get(1).unwrap().status, BookingStatus::Pending);
        let merged = cache.get(2).unwrap();
        assert_eq!(merged.status, BookingStatus::Reserved);
        assert_eq!(merged.down_payment, Some(dec!(400)));
        assert_eq!(merged.total_amount_paid, dec!(400));
        assert_eq!(cache.bookings().len(), 2);
    }

    #[test]
    fn test_merge_unknown_id_is_noop() {
        let mut cache = BookingListCache::new();
        cache.replace(
            BookingListQuery::default(),
            page_of(vec![room_booking(1, BookingStatus::Pending, dec!(1000))]),
        );

        let stranger = room_booking(9, BookingStatus::Reserved, dec!(100));
        assert!(!cache.merge(&stranger));
        assert_eq!(cache.bookings().len(), 1);
        assert!(cache.get(9).is_none());
    }

    #[test]
    fn test_replace_discards_previous_page() {
        let mut cache = BookingListCache::new();
        cache.replace(
            BookingListQuery::default(),
            page_of(vec![room_booking(1, BookingStatus::Pending, dec!(1000))]),
        );
        let second_page = BookingListQuery {
            page: 2,
            ..Default::default()
        };
        cache.replace(
            second_page.clone(),
            page_of(vec![room_booking(5, BookingStatus::Reserved, dec!(300))]),
        );

        assert!(cache.get(1).is_none());
        assert!(cache.get(5).is_some());
        assert_eq!(cache.query(), Some(&second_page));
    }
}
