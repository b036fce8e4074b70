//! Booking status state machine.
//!
//! Every legal status change is listed once in [`TRANSITIONS`] together with
//! the inputs it needs and the side effects it carries. Anything not in the
//! table is rejected before any storage call is made.

use crate::backend::domain::models::booking::BookingStatus;

/// Payment that must accompany a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentRequirement {
    None,
    /// Between half and all of the total price, recorded as the down payment
    DownPayment,
    /// Whatever is still owed; skipped when nothing is owed
    Settlement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRule {
    pub from: BookingStatus,
    pub to: BookingStatus,
    pub payment: PaymentRequirement,
    pub requires_reason: bool,
    /// The booked room/area becomes bookable again
    pub releases_availability: bool,
}

impl TransitionRule {
    const fn new(from: BookingStatus, to: BookingStatus) -> Self {
        Self {
            from,
            to,
            payment: PaymentRequirement::None,
            requires_reason: false,
            releases_availability: false,
        }
    }

    const fn with_payment(mut self, payment: PaymentRequirement) -> Self {
        self.payment = payment;
        self
    }

    const fn with_reason(mut self) -> Self {
        self.requires_reason = true;
        self
    }

    const fn releasing(mut self) -> Self {
        self.releases_availability = true;
        self
    }
}

pub static TRANSITIONS: [TransitionRule; 6] = [
    TransitionRule::new(BookingStatus::Pending, BookingStatus::Reserved)
        .with_payment(PaymentRequirement::DownPayment),
    TransitionRule::new(BookingStatus::Pending, BookingStatus::Rejected)
        .with_reason()
        .releasing(),
    TransitionRule::new(BookingStatus::Reserved, BookingStatus::CheckedIn)
        .with_payment(PaymentRequirement::Settlement),
    TransitionRule::new(BookingStatus::Reserved, BookingStatus::Cancelled)
        .with_reason()
        .releasing(),
    TransitionRule::new(BookingStatus::Reserved, BookingStatus::NoShow).releasing(),
    TransitionRule::new(BookingStatus::CheckedIn, BookingStatus::CheckedOut).releasing(),
];

impl BookingStatus {
    /// The rule for moving from `self` to `target`, if that edge exists.
    pub fn transition_rule(self, target: BookingStatus) -> Option<&'static TransitionRule> {
        TRANSITIONS
            .iter()
            .find(|rule| rule.from == self && rule.to == target)
    }

    pub fn can_transition_to(self, target: BookingStatus) -> bool {
        self.transition_rule(target).is_some()
    }

    pub fn allowed_targets(self) -> Vec<BookingStatus> {
        TRANSITIONS
            .iter()
            .filter(|rule| rule.from == self)
            .map(|rule| rule.to)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_targets_per_status() {
        use BookingStatus::*;

        assert_eq!(Pending.allowed_targets(), vec![Reserved, Rejected]);
        assert_eq!(Reserved.allowed_targets(), vec![CheckedIn, Cancelled, NoShow]);
        assert_eq!(CheckedIn.allowed_targets(), vec![CheckedOut]);
        for terminal in [CheckedOut, Cancelled, Rejected, NoShow] {
            assert!(terminal.allowed_targets().is_empty(), "{} must be terminal", terminal);
        }
    }

    #[test]
    fn test_only_listed_edges_exist() {
        let mut edges = 0;
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                if from.can_transition_to(to) {
                    edges += 1;
                    assert!(!from.is_terminal());
                    assert_ne!(from, to);
                }
            }
        }
        assert_eq!(edges, TRANSITIONS.len());
    }

    #[test]
    fn test_rule_attributes() {
        let reserve = BookingStatus::Pending
            .transition_rule(BookingStatus::Reserved)
            .unwrap();
        assert_eq!(reserve.payment, PaymentRequirement::DownPayment);
        assert!(!reserve.requires_reason);
        assert!(!reserve.releases_availability);

        let reject = BookingStatus::Pending
            .transition_rule(BookingStatus::Rejected)
            .unwrap();
        assert!(reject.requires_reason);
        assert!(reject.releases_availability);

        let check_in = BookingStatus::Reserved
            .transition_rule(BookingStatus::CheckedIn)
            .unwrap();
        assert_eq!(check_in.payment, PaymentRequirement::Settlement);

        let no_show = BookingStatus::Reserved
            .transition_rule(BookingStatus::NoShow)
            .unwrap();
        assert!(!no_show.requires_reason);
        assert!(no_show.releases_availability);
    }

    #[test]
    fn test_backward_edges_are_rejected() {
        assert!(!BookingStatus::Reserved.can_transition_to(BookingStatus::Pending));
        assert!(!BookingStatus::CheckedIn.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::Pending.can_transition_to(BookingStatus::CheckedIn));
    }
}
