//! # IO Module
//!
//! Adapter layer between HTTP clients and the domain.
//!
//! Requests arrive as the DTOs in the `shared` crate, are mapped to domain
//! commands, and results are mapped back. Domain errors are translated to
//! HTTP status codes with a JSON body of the form
//! `{ "error": "...", "code": "..." }`.
//!
//! ## Supported Operations
//!
//! - **GET /api/bookings**: One page of bookings, filtered by status, kind and search
//! - **GET /api/bookings/:id**: A single booking
//! - **GET /api/bookings/:id/ledger**: Payment position of a booking
//! - **POST /api/bookings/:id/transitions**: Move a booking to a new status
//! - **GET /api/analytics/revenue**: Revenue overview for a check-in date range

pub mod rest;

pub use rest::*;
