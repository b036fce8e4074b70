//! Revenue overview for a check-in date range.
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use tracing::info;

use crate::backend::domain::commands::analytics::RevenueQuery;
use crate::backend::domain::models::booking::{Booking, BookingStatus, ResourceKind};
use crate::backend::domain::models::revenue::RevenueSummary;
use crate::backend::domain::payment_ledger::remaining_balance;
use crate::backend::storage::BookingStorage;

#[derive(Clone)]
pub struct RevenueService<S: BookingStorage> {
    storage: S,
}

impl<S: BookingStorage> RevenueService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn revenue_summary(&self, query: RevenueQuery) -> Result<RevenueSummary> {
        if query.from > query.to {
            return Err(anyhow!(
                "Start date {} is after end date {}",
                query.from,
                query.to
            ));
        }

        let bookings = self
            .storage
            .list_bookings_checking_in(query.from, query.to)
            .await?;
        let summary = summarize(query, &bookings);

        info!(
            "Revenue {}..{}: {} bookings, collected {}, outstanding {}",
            summary.from,
            summary.to,
            summary.booking_count,
            summary.collected_revenue,
            summary.outstanding_balance
        );
        Ok(summary)
    }
}

fn summarize(query: RevenueQuery, bookings: &[Booking]) -> RevenueSummary {
    let mut summary = RevenueSummary {
        from: query.from,
        to: query.to,
        booking_count: 0,
        collected_revenue: Decimal::ZERO,
        outstanding_balance: Decimal::ZERO,
        room_revenue: Decimal::ZERO,
        area_revenue: Decimal::ZERO,
        status_counts: BookingStatus::ALL.iter().map(|s| (*s, 0)).collect(),
    };

    for booking in bookings {
        let paid = booking.amount_already_paid();
        summary.booking_count += 1;
        summary.collected_revenue += paid;
        match booking.resource.kind {
            ResourceKind::Room => summary.room_revenue += paid,
            ResourceKind::Area => summary.area_revenue += paid,
        }
        if !booking.status.is_terminal() {
            summary.outstanding_balance += remaining_balance(booking.total_price, paid);
        }
        if let Some((_, count)) = summary
            .status_counts
            .iter_mut()
            .find(|(status, _)| *status == booking.status)
        {
            *count += 1;
        }
    }

    summary
}
