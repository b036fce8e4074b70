/// Test utilities shared by the service and REST tests
///
/// `TestEnvironment` owns an isolated in-memory database. `ScriptedStorage`
/// wraps the real repository and lets a test make individual calls fail the
/// way a remote booking backend would, while counting how often each write
/// was attempted.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::connection::DbConnection;
use super::repositories::BookingRepository;
use super::traits::{BookingStorage, Connection, PaymentOutcome, StatusUpdateOutcome};
use crate::backend::domain::commands::bookings::{BookingListQuery, BookingPage, StatusUpdate};
use crate::backend::domain::models::booking::{Booking, BookingId};
use crate::backend::domain::models::payment::PaymentRecord;

/// Isolated database plus a repository over it
pub struct TestEnvironment {
    pub repository: BookingRepository,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let connection = DbConnection::init_test().await?;
        Ok(Self {
            repository: connection.create_booking_repository(),
        })
    }

    /// Create a test environment already holding `bookings`
    pub async fn with_bookings(bookings: &[Booking]) -> Result<Self> {
        let env = Self::new().await?;
        for booking in bookings {
            env.repository.store_booking(booking).await?;
        }
        Ok(env)
    }

    pub fn scripted_storage(&self) -> ScriptedStorage {
        ScriptedStorage::new(self.repository.clone())
    }
}

/// How a scripted call should fail
#[derive(Debug, Clone)]
pub enum ScriptedFailure {
    /// The call went through and the backend refused it
    Rejected { status_code: u16, message: String },
    /// The call never got an answer
    Network(String),
}

#[derive(Default)]
struct Script {
    payment: Option<ScriptedFailure>,
    status: Option<ScriptedFailure>,
    refetch_fails: bool,
}

/// Storage double that delegates to a real repository unless told to fail
#[derive(Clone)]
pub struct ScriptedStorage {
    inner: BookingRepository,
    script: Arc<Mutex<Script>>,
    payment_calls: Arc<AtomicUsize>,
    status_calls: Arc<AtomicUsize>,
    get_calls: Arc<AtomicUsize>,
}

impl ScriptedStorage {
    pub fn new(inner: BookingRepository) -> Self {
        Self {
            inner,
            script: Arc::new(Mutex::new(Script::default())),
            payment_calls: Arc::new(AtomicUsize::new(0)),
            status_calls: Arc::new(AtomicUsize::new(0)),
            get_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn fail_payments_with(&self, failure: ScriptedFailure) {
        self.script.lock().unwrap().payment = Some(failure);
    }

    pub fn fail_status_updates_with(&self, failure: ScriptedFailure) {
        self.script.lock().unwrap().status = Some(failure);
    }

    /// Let every call through to the repository again
    pub fn clear_failures(&self) {
        *self.script.lock().unwrap() = Script::default();
    }

    /// Make every `get_booking` call fail, as if the backend went away
    pub fn fail_refetch(&self) {
        self.script.lock().unwrap().refetch_fails = true;
    }

    pub fn payment_calls(&self) -> usize {
        self.payment_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingStorage for ScriptedStorage {
    async fn get_booking(&self, booking_id: BookingId) -> Result<Option<Booking>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.script.lock().unwrap().refetch_fails {
            return Err(anyhow!("connection reset while fetching booking {}", booking_id));
        }
        self.inner.get_booking(booking_id).await
    }

    async fn list_bookings(&self, query: &BookingListQuery) -> Result<BookingPage> {
        self.inner.list_bookings(query).await
    }

    async fn list_bookings_checking_in(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Booking>> {
        self.inner.list_bookings_checking_in(from, to).await
    }

    async fn list_payments(&self, booking_id: BookingId) -> Result<Vec<PaymentRecord>> {
        self.inner.list_payments(booking_id).await
    }

    async fn record_payment(&self, booking_id: BookingId, amount: Decimal) -> Result<PaymentOutcome> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.script.lock().unwrap().payment.clone();
        match failure {
            Some(ScriptedFailure::Rejected {
                status_code,
                message,
            }) => Ok(PaymentOutcome::Rejected {
                status_code,
                message,
            }),
            Some(ScriptedFailure::Network(message)) => Err(anyhow!(message)),
            None => self.inner.record_payment(booking_id, amount).await,
        }
    }

    async fn update_status(&self, update: &StatusUpdate) -> Result<StatusUpdateOutcome> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.script.lock().unwrap().status.clone();
        match failure {
            Some(ScriptedFailure::Rejected {
                status_code,
                message,
            }) => Ok(StatusUpdateOutcome::Rejected {
                status_code,
                message,
            }),
            Some(ScriptedFailure::Network(message)) => Err(anyhow!(message)),
            None => self.inner.update_status(update).await,
        }
    }
}
