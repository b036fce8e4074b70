//! # Backend Module
//!
//! Contains all non-UI logic for the booking console.
//!
//! ## Architecture
//!
//! The backend follows a layered architecture:
//! ```text
//! Admin console (browser)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (state machine, ledger, services, booking store)
//!     ↓
//! Storage Layer (SQLite source of record)
//! ```
//!
//! ## Key Responsibilities
//!
//! - Load configuration and open the database
//! - Build the shared booking store and the services around it
//! - Set up the REST API router with CORS for the console origin

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::backend::config::AppConfig;
use crate::backend::domain::{
    BookingQueryService, BookingStore, InMemoryBookingStore, RevenueService, TransitionService,
};
use crate::backend::storage::{BookingRepository, Connection, DbConnection};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub booking_store: Arc<dyn BookingStore>,
    pub booking_query_service: BookingQueryService<BookingRepository>,
    pub transition_service: TransitionService<BookingRepository>,
    pub revenue_service: RevenueService<BookingRepository>,
}

impl AppState {
    /// Wire every service to one repository and one shared booking store
    pub fn new(repository: BookingRepository) -> Self {
        let booking_store: Arc<dyn BookingStore> = Arc::new(InMemoryBookingStore::new());
        Self {
            booking_query_service: BookingQueryService::new(
                repository.clone(),
                booking_store.clone(),
            ),
            transition_service: TransitionService::new(repository.clone(), booking_store.clone()),
            revenue_service: RevenueService::new(repository),
            booking_store,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &AppConfig) -> Result<AppState> {
    info!("Setting up database at {}", config.db.url);
    let db_conn = DbConnection::init(&config.db).await?;

    info!("Setting up domain model");
    let app_state = AppState::new(db_conn.create_booking_repository());

    Ok(app_state)
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin {}", cors_origin))?;

    // CORS setup to allow the console to make requests
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let booking_routes = io::booking_apis::router().merge(io::transition_apis::router());

    let api_routes = Router::new()
        .nest("/bookings", booking_routes)
        .nest("/analytics", io::analytics_apis::router());

    Ok(Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state))
}
