//! Booking transition service.
//!
//! Moves a booking along the status state machine. Input is validated locally
//! first; only then is the change applied optimistically to the
//! [`BookingStore`] and sent to storage: payment first, status second. Any
//! failure after the optimistic step reloads the booking from storage and
//! overwrites the tentative value before the error is returned.

use std::sync::Arc;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::backend::domain::booking_status::{PaymentRequirement, TransitionRule};
use crate::backend::domain::booking_store::BookingStore;
use crate::backend::domain::commands::bookings::{StatusUpdate, TransitionCommand};
use crate::backend::domain::models::booking::{Booking, BookingId, BookingStatus};
use crate::backend::domain::payment_ledger::{
    validate_down_payment, validate_settlement, PaymentValidationError,
};
use crate::backend::storage::{BookingStorage, PaymentOutcome, StatusUpdateOutcome};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransitionError {
    #[error("Cannot move a booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },
    #[error("A reason is required for this status change")]
    MissingReason,
    #[error(transparent)]
    Validation(#[from] PaymentValidationError),
    #[error("Payment could not be recorded ({status_code}): {message}")]
    PaymentRecordingFailed { status_code: u16, message: String },
    #[error("Status could not be updated ({status_code}): {message}")]
    StatusUpdateFailed { status_code: u16, message: String },
    #[error("Booking backend unavailable: {0}")]
    NetworkOrUnknown(String),
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),
}

impl TransitionError {
    pub fn code(&self) -> &'static str {
        match self {
            TransitionError::InvalidTransition { .. } => "INVALID_TRANSITION",
            TransitionError::MissingReason => "MISSING_REASON",
            TransitionError::Validation(e) => e.code(),
            TransitionError::PaymentRecordingFailed { .. } => "PAYMENT_RECORDING_FAILED",
            TransitionError::StatusUpdateFailed { .. } => "STATUS_UPDATE_FAILED",
            TransitionError::NetworkOrUnknown(_) => "BACKEND_UNAVAILABLE",
            TransitionError::BookingNotFound(_) => "BOOKING_NOT_FOUND",
        }
    }
}

/// Everything the outbound calls need, worked out before anything is mutated
struct PlannedTransition {
    tentative: Booking,
    payment: Option<Decimal>,
    status_update: StatusUpdate,
}

#[derive(Clone)]
pub struct TransitionService<S: BookingStorage> {
    storage: S,
    store: Arc<dyn BookingStore>,
}

impl<S: BookingStorage> TransitionService<S> {
    pub fn new(storage: S, store: Arc<dyn BookingStore>) -> Self {
        Self { storage, store }
    }

    pub fn store(&self) -> &Arc<dyn BookingStore> {
        &self.store
    }

    pub async fn apply_transition(
        &self,
        command: TransitionCommand,
    ) -> Result<Booking, TransitionError> {
        info!(
            "Applying transition on booking {} to {}",
            command.booking_id, command.target_status
        );

        let current = self.current_booking(command.booking_id).await?;
        let rule = current
            .status
            .transition_rule(command.target_status)
            .ok_or(TransitionError::InvalidTransition {
                from: current.status,
                to: command.target_status,
            })?;

        let plan = plan_transition(&current, rule, &command)?;
        debug!(
            "Booking {} plan: payment {:?}, release {}",
            current.id, plan.payment, plan.status_update.release_availability
        );

        self.store.apply_optimistic(plan.tentative);

        if let Some(amount) = plan.payment {
            match self.storage.record_payment(current.id, amount).await {
                Ok(PaymentOutcome::Recorded {
                    total_amount_paid, ..
                }) => {
                    debug!(
                        "Booking {} payment of {} recorded, paid {}",
                        current.id, amount, total_amount_paid
                    );
                }
                Ok(PaymentOutcome::Rejected {
                    status_code,
                    message,
                }) => {
                    self.roll_back(current.id).await;
                    return Err(TransitionError::PaymentRecordingFailed {
                        status_code,
                        message,
                    });
                }
                Err(e) => {
                    self.roll_back(current.id).await;
                    return Err(TransitionError::NetworkOrUnknown(e.to_string()));
                }
            }
        }

        let booking = match self.storage.update_status(&plan.status_update).await {
            Ok(StatusUpdateOutcome::Updated { booking, message }) => {
                if let Some(message) = message {
                    debug!("Status update message: {}", message);
                }
                booking
            }
            Ok(StatusUpdateOutcome::Rejected {
                status_code,
                message,
            }) => {
                self.roll_back(current.id).await;
                return Err(TransitionError::StatusUpdateFailed {
                    status_code,
                    message,
                });
            }
            Err(e) => {
                self.roll_back(current.id).await;
                return Err(TransitionError::NetworkOrUnknown(e.to_string()));
            }
        };

        self.store.commit(booking.clone());
        info!(
            "Booking {} moved from {} to {}",
            booking.id, current.status, booking.status
        );
        Ok(booking)
    }

    /// Cached copy when there is one, otherwise a fetch that also fills the
    /// detail slot.
    async fn current_booking(&self, booking_id: BookingId) -> Result<Booking, TransitionError> {
        if let Some(booking) = self.store.current(booking_id) {
            return Ok(booking);
        }

        debug!("Booking {} not cached, fetching", booking_id);
        match self.storage.get_booking(booking_id).await {
            Ok(Some(booking)) => {
                self.store.set_detail(booking.clone());
                Ok(booking)
            }
            Ok(None) => Err(TransitionError::BookingNotFound(booking_id)),
            Err(e) => Err(TransitionError::NetworkOrUnknown(e.to_string())),
        }
    }

    async fn roll_back(&self, booking_id: BookingId) {
        let truth = match self.storage.get_booking(booking_id).await {
            Ok(truth) => truth,
            Err(e) => {
                warn!(
                    "Could not reload booking {} for rollback, restoring snapshot: {}",
                    booking_id, e
                );
                None
            }
        };

        let restored = self.store.rollback(booking_id, truth);
        warn!(
            "Rolled back booking {} to {:?}",
            booking_id,
            restored.map(|b| b.status)
        );
    }
}

fn plan_transition(
    current: &Booking,
    rule: &TransitionRule,
    command: &TransitionCommand,
) -> Result<PlannedTransition, TransitionError> {
    let reason = command
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    if rule.requires_reason && reason.is_none() {
        return Err(TransitionError::MissingReason);
    }

    let mut tentative = current.clone();
    tentative.status = rule.to;
    let mut payment = None;
    let mut down_payment = None;

    match rule.payment {
        PaymentRequirement::None => {}
        PaymentRequirement::DownPayment => {
            let amount = validate_down_payment(current.total_price, command.entered_amount)?;
            // A retry after a recorded payment only sends the difference
            let already_paid = current.amount_already_paid();
            let outstanding = amount - already_paid;
            tentative.down_payment = Some(amount);
            tentative.total_amount_paid = already_paid.max(amount);
            if outstanding > Decimal::ZERO {
                payment = Some(outstanding);
            }
            down_payment = Some(amount);
        }
        PaymentRequirement::Settlement => {
            let already_paid = current.amount_already_paid();
            if let Some(amount) =
                validate_settlement(current.total_price, already_paid, command.entered_amount)?
            {
                tentative.total_amount_paid = already_paid + amount;
                payment = Some(amount);
            }
        }
    }

    if rule.requires_reason {
        tentative.reason = reason.clone();
    }

    let release_availability =
        rule.releases_availability && command.release_availability.unwrap_or(true);

    Ok(PlannedTransition {
        tentative,
        payment,
        status_update: StatusUpdate {
            booking_id: current.id,
            from: rule.from,
            status: rule.to,
            reason: if rule.requires_reason { reason } else { None },
            down_payment,
            release_availability,
        },
    })
}
