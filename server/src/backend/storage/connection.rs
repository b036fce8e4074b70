use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::info;

use crate::backend::config::DbConfig;
use crate::backend::storage::repositories::BookingRepository;
use crate::backend::storage::traits::Connection;

/// DbConnection manages database operations
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Create a new database connection
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        // Create database if it doesn't exist
        if !Sqlite::database_exists(url).await.unwrap_or(false) {
            info!("Creating database {}", url);
            Sqlite::create_database(url).await?
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize the database described by the configuration
    pub async fn init(config: &DbConfig) -> Result<Self> {
        Self::new(&config.url, config.max_connections).await
    }

    /// Initialize a test database with a unique name
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let test_id = uuid::Uuid::new_v4().to_string();
        let db_url = format!("file:memdb_{}?mode=memory&cache=shared", test_id);

        Self::new(&db_url, 1).await
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Resource name and discounted price are copied onto the booking at
        // creation; this table only tracks availability.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS resources (
                kind TEXT NOT NULL CHECK (kind IN ('room', 'area')),
                id INTEGER NOT NULL,
                name TEXT NOT NULL,
                is_available BOOLEAN NOT NULL DEFAULT TRUE,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                PRIMARY KEY (kind, id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Amounts are stored as decimal TEXT to keep them exact
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY,
                status TEXT NOT NULL,
                total_price TEXT NOT NULL,
                down_payment TEXT,
                total_amount_paid TEXT NOT NULL DEFAULT '0',
                check_in_date TEXT NOT NULL,
                check_out_date TEXT NOT NULL,
                resource_kind TEXT NOT NULL CHECK (resource_kind IN ('room', 'area')),
                resource_id INTEGER NOT NULL,
                resource_name TEXT NOT NULL,
                resource_discounted_price TEXT,
                guest_name TEXT NOT NULL,
                guest_email TEXT NOT NULL,
                guest_verified BOOLEAN NOT NULL DEFAULT FALSE,
                reason TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_bookings_status
            ON bookings(status);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_bookings_check_in_date
            ON bookings(check_in_date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS payments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_id INTEGER NOT NULL,
                amount TEXT NOT NULL,
                recorded_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                FOREIGN KEY (booking_id) REFERENCES bookings (id)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_payments_booking_id
            ON payments(booking_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type BookingRepository = BookingRepository;

    fn create_booking_repository(&self) -> Self::BookingRepository {
        BookingRepository::new(self.clone())
    }
}
