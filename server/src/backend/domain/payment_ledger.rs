//! Payment ledger for bookings.
//!
//! Pure computation over total price, down payment and the cumulative amount
//! paid. Validation never fails with a panic or an `anyhow` error: it returns a
//! [`PaymentValidationError`] the caller can show next to the amount input.

use crate::backend::domain::models::booking::Booking;
use crate::backend::domain::money::non_negative;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentValidationError {
    #[error("Please enter an amount")]
    AmountRequired,
    #[error("Amount exceeds the limit of {limit}")]
    AmountExceedsLimit { limit: Decimal },
    #[error("Amount is below the minimum of {minimum}")]
    AmountBelowMinimum { minimum: Decimal },
    #[error("Amount must be greater than zero")]
    AmountIsZero,
}

impl PaymentValidationError {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            PaymentValidationError::AmountRequired => "AMOUNT_REQUIRED",
            PaymentValidationError::AmountExceedsLimit { .. } => "AMOUNT_EXCEEDS_LIMIT",
            PaymentValidationError::AmountBelowMinimum { .. } => "AMOUNT_BELOW_MINIMUM",
            PaymentValidationError::AmountIsZero => "AMOUNT_IS_ZERO",
        }
    }
}

pub fn required_down_payment(total_price: Decimal) -> Decimal {
    total_price / Decimal::TWO
}

pub fn remaining_balance(total_price: Decimal, already_paid: Decimal) -> Decimal {
    non_negative(total_price - already_paid)
}

pub fn is_fully_paid(total_price: Decimal, already_paid: Decimal) -> bool {
    already_paid >= total_price
}

/// Validate the down payment entered when reserving a pending booking.
///
/// Accepts `total/2 <= entered <= total`.
pub fn validate_down_payment(
    total_price: Decimal,
    entered: Option<Decimal>,
) -> Result<Decimal, PaymentValidationError> {
    let amount = entered.ok_or(PaymentValidationError::AmountRequired)?;

    if amount > total_price {
        return Err(PaymentValidationError::AmountExceedsLimit { limit: total_price });
    }
    let minimum = required_down_payment(total_price);
    if amount < minimum {
        return Err(PaymentValidationError::AmountBelowMinimum { minimum });
    }
    Ok(amount)
}

/// Validate the payment entered at check-in.
///
/// Returns the amount to record, or `None` when the booking is already fully
/// paid and no payment call is needed. When a balance is owed the entered
/// amount has to settle it exactly.
pub fn validate_settlement(
    total_price: Decimal,
    already_paid: Decimal,
    entered: Option<Decimal>,
) -> Result<Option<Decimal>, PaymentValidationError> {
    let remaining = remaining_balance(total_price, already_paid);

    if remaining.is_zero() {
        return match entered {
            Some(amount) if amount > Decimal::ZERO => {
                Err(PaymentValidationError::AmountExceedsLimit { limit: remaining })
            }
            _ => Ok(None),
        };
    }

    let amount = entered.ok_or(PaymentValidationError::AmountRequired)?;
    if amount.is_zero() {
        return Err(PaymentValidationError::AmountIsZero);
    }
    if amount > remaining {
        return Err(PaymentValidationError::AmountExceedsLimit { limit: remaining });
    }
    if amount < remaining {
        return Err(PaymentValidationError::AmountBelowMinimum { minimum: remaining });
    }
    Ok(Some(amount))
}

/// Payment position of one booking
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSummary {
    pub total_price: Decimal,
    pub required_down_payment: Decimal,
    pub down_payment: Option<Decimal>,
    pub total_amount_paid: Decimal,
    pub remaining_balance: Decimal,
    pub is_fully_paid: bool,
}

impl LedgerSummary {
    pub fn for_booking(booking: &Booking) -> Self {
        let already_paid = booking.amount_already_paid();
        Self {
            total_price: booking.total_price,
            required_down_payment: required_down_payment(booking.total_price),
            down_payment: booking.down_payment,
            total_amount_paid: booking.total_amount_paid,
            remaining_balance: remaining_balance(booking.total_price, already_paid),
            is_fully_paid: is_fully_paid(booking.total_price, already_paid),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::booking::{fixtures::room_booking, BookingStatus};
    use rust_decimal_macros::dec;

    #[test]
    fn test_required_down_payment_is_half() {
        assert_eq!(required_down_payment(dec!(1000)), dec!(500));
        assert_eq!(required_down_payment(dec!(999.99)), dec!(499.995));
    }

    #[test]
    fn test_remaining_balance_never_negative() {
        let cases = [
            (dec!(1000), dec!(0), dec!(1000)),
            (dec!(1000), dec!(600), dec!(400)),
            (dec!(1000), dec!(1000), dec!(0)),
            (dec!(1000), dec!(1200), dec!(0)),
            (dec!(0), dec!(0), dec!(0)),
        ];
        for (total, paid, expected) in cases {
            assert_eq!(remaining_balance(total, paid), expected);
            assert_eq!(remaining_balance(total, paid), (total - paid).max(Decimal::ZERO));
        }
    }

    #[test]
    fn test_is_fully_paid() {
        assert!(is_fully_paid(dec!(1000), dec!(1000)));
        assert!(is_fully_paid(dec!(1000), dec!(1000.01)));
        assert!(!is_fully_paid(dec!(1000), dec!(999.99)));
    }

    #[test]
    fn test_down_payment_range() {
        let total = dec!(1000);
        assert_eq!(validate_down_payment(total, Some(dec!(500))), Ok(dec!(500)));
        assert_eq!(validate_down_payment(total, Some(dec!(600))), Ok(dec!(600)));
        assert_eq!(validate_down_payment(total, Some(dec!(1000))), Ok(dec!(1000)));
        assert_eq!(
            validate_down_payment(total, Some(dec!(400))),
            Err(PaymentValidationError::AmountBelowMinimum { minimum: dec!(500) })
        );
        assert_eq!(
            validate_down_payment(total, Some(dec!(499.99))),
            Err(PaymentValidationError::AmountBelowMinimum { minimum: dec!(500) })
        );
        assert_eq!(
            validate_down_payment(total, Some(dec!(1000.01))),
            Err(PaymentValidationError::AmountExceedsLimit { limit: dec!(1000) })
        );
        assert_eq!(
            validate_down_payment(total, None),
            Err(PaymentValidationError::AmountRequired)
        );
    }

    #[test]
    fn test_down_payment_property_over_grid() {
        let total = dec!(850);
        let mut amount = dec!(0);
        while amount <= dec!(1000) {
            let result = validate_down_payment(total, Some(amount));
            let in_range = amount >= total / Decimal::TWO && amount <= total;
            assert_eq!(result.is_ok(), in_range, "amount {}", amount);
            amount += dec!(12.5);
        }
    }

    #[test]
    fn test_settlement_requires_exact_remaining() {
        let total = dec!(1000);
        let paid = dec!(600);
        assert_eq!(validate_settlement(total, paid, Some(dec!(400))), Ok(Some(dec!(400))));
        assert_eq!(
            validate_settlement(total, paid, Some(dec!(300))),
            Err(PaymentValidationError::AmountBelowMinimum { minimum: dec!(400) })
        );
        assert_eq!(
            validate_settlement(total, paid, Some(dec!(401))),
            Err(PaymentValidationError::AmountExceedsLimit { limit: dec!(400) })
        );
        assert_eq!(
            validate_settlement(total, paid, Some(dec!(0))),
            Err(PaymentValidationError::AmountIsZero)
        );
        assert_eq!(
            validate_settlement(total, paid, None),
            Err(PaymentValidationError::AmountRequired)
        );
    }

    #[test]
    fn test_settlement_when_fully_paid() {
        let total = dec!(1000);
        assert_eq!(validate_settlement(total, dec!(1000), Some(dec!(0))), Ok(None));
        assert_eq!(validate_settlement(total, dec!(1000), None), Ok(None));
        assert_eq!(
            validate_settlement(total, dec!(1000), Some(dec!(50))),
            Err(PaymentValidationError::AmountExceedsLimit { limit: dec!(0) })
        );
    }

    #[test]
    fn test_ledger_summary_for_reserved_booking() {
        let mut booking = room_booking(1, BookingStatus::Reserved, dec!(1000));
        booking.down_payment = Some(dec!(600));
        booking.total_amount_paid = dec!(600);

        let summary = LedgerSummary::for_booking(&booking);
        assert_eq!(summary.required_down_payment, dec!(500));
        assert_eq!(summary.remaining_balance, dec!(400));
        assert!(!summary.is_fully_paid);
    }
}
