use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde_json::Value;
use tracing::{error, info};

use crate::backend::io::rest::mappers::booking_mapper::BookingMapper;
use crate::backend::AppState;
use shared::{
    Booking, BookingListRequest, BookingListResponse, LedgerSummaryResponse,
    PaymentHistoryResponse,
};

/// Create the booking read API router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookings))
        .route("/:id", get(get_booking))
        .route("/:id/ledger", get(get_booking_ledger))
        .route("/:id/payments", get(get_booking_payments))
}

fn not_found(booking_id: i64) -> (StatusCode, Json<Value>) {
    let error_response = serde_json::json!({
        "error": format!("Booking {} not found", booking_id),
        "code": "BOOKING_NOT_FOUND"
    });
    (StatusCode::NOT_FOUND, Json(error_response))
}

fn internal_error(message: &str) -> (StatusCode, Json<Value>) {
    let error_response = serde_json::json!({
        "error": message,
        "code": "STORAGE_ERROR"
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(error_response))
}

/// List one page of bookings, replacing the cached list
pub async fn list_bookings(
    State(app_state): State<AppState>,
    Query(request): Query<BookingListRequest>,
) -> Result<Json<BookingListResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/bookings - request: {:?}", request);

    let query = BookingMapper::to_list_query(request);
    match app_state.booking_query_service.refresh_bookings(query).await {
        Ok(page) => Ok(Json(BookingMapper::to_list_response(page))),
        Err(e) => {
            error!("Failed to list bookings: {}", e);
            Err(internal_error("Failed to list bookings"))
        }
    }
}

pub async fn get_booking(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<Booking>, (StatusCode, Json<Value>)> {
    info!("GET /api/bookings/{}", booking_id);

    match app_state.booking_query_service.load_booking(booking_id).await {
        Ok(Some(booking)) => Ok(Json(BookingMapper::to_dto(booking))),
        Ok(None) => Err(not_found(booking_id)),
        Err(e) => {
            error!("Failed to load booking {}: {}", booking_id, e);
            Err(internal_error("Failed to load booking"))
        }
    }
}

/// Payment position of a booking: paid so far, required down payment, and
/// what is still owed
pub async fn get_booking_ledger(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<LedgerSummaryResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/bookings/{}/ledger", booking_id);

    match app_state.booking_query_service.ledger_summary(booking_id).await {
        Ok(Some(ledger)) => Ok(Json(BookingMapper::to_ledger_response(booking_id, ledger))),
        Ok(None) => Err(not_found(booking_id)),
        Err(e) => {
            error!("Failed to load ledger for booking {}: {}", booking_id, e);
            Err(internal_error("Failed to load booking ledger"))
        }
    }
}

pub async fn get_booking_payments(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i64>,
) -> Result<Json<PaymentHistoryResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/bookings/{}/payments", booking_id);

    match app_state.booking_query_service.payment_history(booking_id).await {
        Ok(Some(payments)) => Ok(Json(BookingMapper::to_payment_history_response(
            booking_id, payments,
        ))),
        Ok(None) => Err(not_found(booking_id)),
        Err(e) => {
            error!("Failed to load payments for booking {}: {}", booking_id, e);
            Err(internal_error("Failed to load booking payments"))
        }
    }
}
