//! # Domain Module
//!
//! Contains the business logic of the booking console.
//!
//! The domain knows about bookings, their status lifecycle and their payment
//! position. It does not know about HTTP or SQL: storage is reached through
//! the `BookingStorage` trait and the REST layer maps DTOs to the command
//! types in [`commands`].
//!
//! ## Module Organization
//!
//! - **booking_status**: The status state machine, one rule per legal edge
//! - **payment_ledger**: Down payment and settlement rules, remaining balance
//! - **money**: Parsing entered amounts and formatting them for display
//! - **booking_list_cache** / **booking_store**: Shared state with optimistic
//!   updates, commit and rollback
//! - **transition_service**: Validates and applies status transitions
//! - **booking_query_service**: List, detail and ledger reads
//! - **revenue_service**: Revenue overview over a check-in date range
//!
//! ## Business Rules
//!
//! - Only the edges listed in `booking_status::TRANSITIONS` are allowed
//! - Reserving needs a down payment between half and all of the total price
//! - Checking in settles exactly the remaining balance, if any
//! - Rejecting and cancelling need a non-blank reason
//! - Leaving the active lifecycle releases the booked room/area

pub mod booking_list_cache;
pub mod booking_query_service;
pub mod booking_status;
pub mod booking_store;
pub mod commands;
pub mod models;
pub mod money;
pub mod payment_ledger;
pub mod revenue_service;
pub mod transition_service;

pub use booking_query_service::BookingQueryService;
pub use booking_store::{BookingStore, BookingStoreEvent, InMemoryBookingStore};
pub use revenue_service::RevenueService;
pub use transition_service::{TransitionError, TransitionService};
