//! # REST API Interface Layer
//!
//! HTTP endpoints for the booking console. Handlers log their route on entry,
//! map DTOs to domain commands, and never contain business rules.

// Module declarations
pub mod analytics_apis;
pub mod booking_apis;
pub mod mappers;
pub mod transition_apis;
