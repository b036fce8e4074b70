//! Read side of the booking console: list pages, single bookings and their
//! payment position. Every read also refreshes the shared [`BookingStore`].

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::backend::domain::booking_store::BookingStore;
use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage};
use crate::backend::domain::models::booking::{Booking, BookingId};
use crate::backend::domain::models::payment::PaymentRecord;
use crate::backend::domain::payment_ledger::LedgerSummary;
use crate::backend::storage::BookingStorage;

#[derive(Clone)]
pub struct BookingQueryService<S: BookingStorage> {
    storage: S,
    store: Arc<dyn BookingStore>,
}

impl<S: BookingStorage> BookingQueryService<S> {
    pub fn new(storage: S, store: Arc<dyn BookingStore>) -> Self {
        Self { storage, store }
    }

    /// Full refetch of one page; replaces the cached list.
    pub async fn refresh_bookings(&self, query: BookingListQuery) -> Result<BookingPage> {
        let query = query.normalized();
        let page = self.storage.list_bookings(&query).await?;
        info!(
            "Loaded {} bookings (page {}, has_more {})",
            page.bookings.len(),
            page.page,
            page.has_more
        );
        self.store.replace_list(query, page.clone());
        Ok(page)
    }

    /// Fetch one booking into the detail slot. `None` when it does not exist.
    pub async fn load_booking(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let booking = self.storage.get_booking(booking_id).await?;
        if let Some(booking) = &booking {
            self.store.set_detail(booking.clone());
        }
        Ok(booking)
    }

    pub async fn ledger_summary(&self, booking_id: BookingId) -> Result<Option<LedgerSummary>> {
        let booking = self.load_booking(booking_id).await?;
        Ok(booking.as_ref().map(LedgerSummary::for_booking))
    }

    /// Payments recorded so far. `None` when the booking does not exist.
    pub async fn payment_history(
        &self,
        booking_id: BookingId,
    ) -> Result<Option<Vec<PaymentRecord>>> {
        if self.load_booking(booking_id).await?.is_none() {
            return Ok(None);
        }
        let payments = self.storage.list_payments(booking_id).await?;
        info!("Loaded {} payments for booking {}", payments.len(), booking_id);
        Ok(Some(payments))
    }
}
