use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, QueryBuilder, Row, Sqlite};
use std::str::FromStr;
use tracing::{info, warn};

use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage, StatusUpdate};
use crate::backend::domain::models::booking::{
    BookedResource, Booking, BookingId, BookingStatus, Guest, ResourceKind,
};
use crate::backend::domain::models::payment::PaymentRecord;
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::traits::{BookingStorage, PaymentOutcome, StatusUpdateOutcome};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_BOOKING: &str = r#"
    SELECT id, status, total_price, down_payment, total_amount_paid,
           check_in_date, check_out_date, resource_kind, resource_id,
           resource_name, resource_discounted_price,
           guest_name, guest_email, guest_verified, reason
    FROM bookings
"#;

/// Repository for booking, payment and availability records
#[derive(Clone)]
pub struct BookingRepository {
    db: DbConnection,
}

impl BookingRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Insert a booking as created by the guest-facing flow and mark its
    /// room/area as taken.
    pub async fn store_booking(&self, booking: &Booking) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, status, total_price, down_payment, total_amount_paid,
                check_in_date, check_out_date, resource_kind, resource_id,
                resource_name, resource_discounted_price,
                guest_name, guest_email, guest_verified, reason
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(booking.id)
        .bind(booking.status.as_str())
        .bind(booking.total_price.to_string())
        .bind(booking.down_payment.map(|d| d.to_string()))
        .bind(booking.total_amount_paid.to_string())
        .bind(booking.check_in_date.format(DATE_FORMAT).to_string())
        .bind(booking.check_out_date.format(DATE_FORMAT).to_string())
        .bind(booking.resource.kind.as_str())
        .bind(booking.resource.id)
        .bind(&booking.resource.name)
        .bind(booking.resource.discounted_price.map(|d| d.to_string()))
        .bind(&booking.guest.name)
        .bind(&booking.guest.email)
        .bind(booking.guest.is_verified)
        .bind(&booking.reason)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO resources (kind, id, name, is_available)
            VALUES (?, ?, ?, FALSE)
            ON CONFLICT (kind, id) DO UPDATE SET
                is_available = FALSE,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(booking.resource.kind.as_str())
        .bind(booking.resource.id)
        .bind(&booking.resource.name)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Register a room or area, or overwrite its availability
    pub async fn store_resource(
        &self,
        kind: ResourceKind,
        id: i64,
        name: &str,
        is_available: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO resources (kind, id, name, is_available)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (kind, id) DO UPDATE SET
                name = excluded.name,
                is_available = excluded.is_available,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(kind.as_str())
        .bind(id)
        .bind(name)
        .bind(is_available)
        .execute(self.db.pool())
        .await?;

        Ok(())
    }

    /// Availability of a room or area, `None` when it is unknown
    pub async fn is_resource_available(&self, kind: ResourceKind, id: i64) -> Result<Option<bool>> {
        let row = sqlx::query("SELECT is_available FROM resources WHERE kind = ? AND id = ?")
            .bind(kind.as_str())
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|r| r.get::<bool, _>("is_available")))
    }
}

#[async_trait]
impl BookingStorage for BookingRepository {
    async fn get_booking(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_BOOKING))
            .bind(booking_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(booking_from_row).transpose()
    }

    async fn list_bookings(&self, query: &BookingListQuery) -> Result<BookingPage> {
        let mut builder = QueryBuilder::<Sqlite>::new(SELECT_BOOKING);
        builder.push(" WHERE 1 = 1");

        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(kind) = query.kind {
            builder.push(" AND resource_kind = ").push_bind(kind.as_str());
        }
        if let Some(search) = &query.search {
            let pattern = format!("%{}%", search.to_lowercase());
            builder
                .push(" AND (LOWER(guest_name) LIKE ")
                .push_bind(pattern.clone())
                .push(" OR LOWER(guest_email) LIKE ")
                .push_bind(pattern)
                .push(")");
        }

        // One extra row tells us whether another page exists
        builder
            .push(" ORDER BY id DESC LIMIT ")
            .push_bind(i64::from(query.page_size) + 1)
            .push(" OFFSET ")
            .push_bind(i64::from(query.offset()));

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        let mut bookings = rows.iter().map(booking_from_row).collect::<Result<Vec<_>>>()?;

        let has_more = bookings.len() > query.page_size as usize;
        if has_more {
            bookings.truncate(query.page_size as usize);
        }

        Ok(BookingPage {
            bookings,
            page: query.page,
            page_size: query.page_size,
            has_more,
        })
    }

    async fn list_bookings_checking_in(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>> {
        let rows = sqlx::query(&format!(
            "{} WHERE check_in_date BETWEEN ? AND ? ORDER BY check_in_date ASC, id ASC",
            SELECT_BOOKING
        ))
        .bind(from.format(DATE_FORMAT).to_string())
        .bind(to.format(DATE_FORMAT).to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(booking_from_row).collect()
    }

    async fn list_payments(&self, booking_id: BookingId) -> Result<Vec<PaymentRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, booking_id, amount, recorded_at
            FROM payments
            WHERE booking_id = ?
            ORDER BY id ASC
            "#,
        )
        .bind(booking_id)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter()
            .map(|row| {
                Ok(PaymentRecord {
                    id: row.get("id"),
                    booking_id: row.get("booking_id"),
                    amount: parse_decimal(row.get("amount"))?,
                    recorded_at: row.get("recorded_at"),
                })
            })
            .collect()
    }

    async fn record_payment(&self, booking_id: BookingId, amount: Decimal) -> Result<PaymentOutcome> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(
            "SELECT total_price, down_payment, total_amount_paid FROM bookings WHERE id = ?",
        )
            .bind(booking_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            warn!("Payment for unknown booking {}", booking_id);
            return Ok(PaymentOutcome::Rejected {
                status_code: 404,
                message: format!("Booking {} not found", booking_id),
            });
        };

        let total_price = parse_decimal(row.get("total_price"))?;
        let down_payment = row
            .get::<Option<String>, _>("down_payment")
            .map(parse_decimal)
            .transpose()?
            .unwrap_or(Decimal::ZERO);
        // A booking reserved before payments were tracked only carries its down payment
        let already_paid = parse_decimal(row.get("total_amount_paid"))?.max(down_payment);

        if amount <= Decimal::ZERO {
            return Ok(PaymentOutcome::Rejected {
                status_code: 422,
                message: "Payment amount must be greater than zero".to_string(),
            });
        }
        let total_amount_paid = already_paid + amount;
        if total_amount_paid > total_price {
            warn!(
                "Rejected overpayment on booking {}: {} + {} > {}",
                booking_id, already_paid, amount, total_price
            );
            return Ok(PaymentOutcome::Rejected {
                status_code: 422,
                message: format!(
                    "Payment of {} exceeds the remaining balance of {}",
                    amount,
                    total_price - already_paid
                ),
            });
        }

        sqlx::query("INSERT INTO payments (booking_id, amount) VALUES (?, ?)")
            .bind(booking_id)
            .bind(amount.to_string())
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE bookings SET total_amount_paid = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(total_amount_paid.to_string())
        .bind(booking_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            "Recorded payment of {} on booking {} (paid {} of {})",
            amount, booking_id, total_amount_paid, total_price
        );
        Ok(PaymentOutcome::Recorded {
            booking_id,
            amount,
            total_amount_paid,
        })
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusUpdateOutcome> {
        let mut tx = self.db.pool().begin().await?;

        let row = sqlx::query(
            "SELECT status, total_price, resource_kind, resource_id FROM bookings WHERE id = ?",
        )
        .bind(update.booking_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            warn!("Status update for unknown booking {}", update.booking_id);
            return Ok(StatusUpdateOutcome::Rejected {
                status_code: 404,
                message: format!("Booking {} not found", update.booking_id),
            });
        };

        if let Some(down_payment) = update.down_payment {
            let total_price = parse_decimal(row.get("total_price"))?;
            if down_payment < Decimal::ZERO || down_payment > total_price {
                return Ok(StatusUpdateOutcome::Rejected {
                    status_code: 422,
                    message: format!(
                        "Down payment {} must be between 0 and {}",
                        down_payment, total_price
                    ),
                });
            }
        }

        let updated = sqlx::query(
            r#"
            UPDATE bookings SET
                status = ?,
                reason = COALESCE(?, reason),
                down_payment = COALESCE(?, down_payment),
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND status = ?
            "#,
        )
        .bind(update.status.as_str())
        .bind(&update.reason)
        .bind(update.down_payment.map(|d| d.to_string()))
        .bind(update.booking_id)
        .bind(update.from.as_str())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            let stored: String = row.get("status");
            warn!(
                "Stale status update on booking {}: expected {}, stored {}",
                update.booking_id, update.from, stored
            );
            return Ok(StatusUpdateOutcome::Rejected {
                status_code: 409,
                message: format!(
                    "Booking {} is {}, not {}",
                    update.booking_id, stored, update.from
                ),
            });
        }

        if update.release_availability {
            let kind: String = row.get("resource_kind");
            let resource_id: i64 = row.get("resource_id");
            sqlx::query(
                r#"
                UPDATE resources SET is_available = TRUE, updated_at = CURRENT_TIMESTAMP
                WHERE kind = ? AND id = ?
                "#,
            )
            .bind(&kind)
            .bind(resource_id)
            .execute(&mut *tx)
            .await?;
            info!("Released {} {} for booking {}", kind, resource_id, update.booking_id);
        }

        tx.commit().await?;

        let booking = self
            .get_booking(update.booking_id)
            .await?
            .ok_or_else(|| anyhow!("Booking {} vanished after update", update.booking_id))?;

        info!("Booking {} is now {}", booking.id, booking.status);
        Ok(StatusUpdateOutcome::Updated {
            message: Some(format!("Booking {} is now {}", booking.id, booking.status)),
            booking,
        })
    }
}

fn parse_decimal(value: String) -> Result<Decimal> {
    Decimal::from_str(&value).with_context(|| format!("Invalid stored amount: {}", value))
}

fn parse_date(value: String) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .with_context(|| format!("Invalid stored date: {}", value))
}

fn booking_from_row(row: &SqliteRow) -> Result<Booking> {
    let status: String = row.get("status");
    let kind: String = row.get("resource_kind");

    Ok(Booking {
        id: row.get("id"),
        status: BookingStatus::parse(&status)
            .ok_or_else(|| anyhow!("Invalid stored status: {}", status))?,
        total_price: parse_decimal(row.get("total_price"))?,
        down_payment: row
            .get::<Option<String>, _>("down_payment")
            .map(parse_decimal)
            .transpose()?,
        total_amount_paid: parse_decimal(row.get("total_amount_paid"))?,
        check_in_date: parse_date(row.get("check_in_date"))?,
        check_out_date: parse_date(row.get("check_out_date"))?,
        resource: BookedResource {
            kind: ResourceKind::parse(&kind)
                .ok_or_else(|| anyhow!("Invalid stored resource kind: {}", kind))?,
            id: row.get("resource_id"),
            name: row.get("resource_name"),
            discounted_price: row
                .get::<Option<String>, _>("resource_discounted_price")
                .map(parse_decimal)
                .transpose()?,
        },
        guest: Guest {
            name: row.get("guest_name"),
            email: row.get("guest_email"),
            is_verified: row.get("guest_verified"),
        },
        reason: row.get("reason"),
    })
}
