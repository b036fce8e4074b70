use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::post,
    Router,
};
use serde_json::Value;
use tracing::{info, warn};

use crate::backend::domain::commands::bookings::TransitionCommand;
use crate::backend::domain::models::booking::{Booking as DomainBooking, BookingStatus};
use crate::backend::domain::money::{format_amount, parse_amount};
use crate::backend::domain::TransitionError;
use crate::backend::io::rest::mappers::booking_mapper::BookingMapper;
use crate::backend::AppState;
use shared::{TransitionRequest, TransitionResponse};

/// Create the booking transition API router
pub fn router() -> Router<AppState> {
    Router::new().route("/:id/transitions", post(apply_transition))
}

/// Translate a failed transition into an HTTP error
pub fn transition_error_response(error: &TransitionError) -> (StatusCode, Json<Value>) {
    let status = match error {
        TransitionError::InvalidTransition { .. } => StatusCode::CONFLICT,
        TransitionError::MissingReason => StatusCode::BAD_REQUEST,
        TransitionError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TransitionError::PaymentRecordingFailed { .. }
        | TransitionError::StatusUpdateFailed { .. }
        | TransitionError::NetworkOrUnknown(_) => StatusCode::BAD_GATEWAY,
        TransitionError::BookingNotFound(_) => StatusCode::NOT_FOUND,
    };
    let error_response = serde_json::json!({
        "error": error.to_string(),
        "code": error.code()
    });
    (status, Json(error_response))
}

fn success_message(booking: &DomainBooking) -> String {
    match booking.status {
        BookingStatus::Reserved => format!(
            "Booking {} reserved with a down payment of {}",
            booking.id,
            format_amount(booking.down_payment.unwrap_or_default())
        ),
        BookingStatus::CheckedIn => format!("Guest checked in for booking {}", booking.id),
        BookingStatus::CheckedOut => format!("Guest checked out for booking {}", booking.id),
        BookingStatus::Cancelled => format!("Booking {} cancelled", booking.id),
        BookingStatus::Rejected => format!("Booking {} rejected", booking.id),
        BookingStatus::NoShow => format!("Booking {} marked as no-show", booking.id),
        BookingStatus::Pending => format!("Booking {} is pending", booking.id),
    }
}

/// Move a booking to a new status
#[axum::debug_handler]
pub async fn apply_transition(
    State(app_state): State<AppState>,
    Path(booking_id): Path<i64>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, (StatusCode, Json<Value>)> {
    info!(
        "POST /api/bookings/{}/transitions - request: {:?}",
        booking_id, request
    );

    // The amount arrives as the raw text typed into the console
    let entered_amount = match request.amount.as_deref().map(parse_amount).transpose() {
        Ok(amount) => amount.flatten(),
        Err(e) => {
            warn!("Rejected amount {:?}: {}", request.amount, e);
            let error_response = serde_json::json!({
                "error": e.to_string(),
                "code": "INVALID_AMOUNT_FORMAT"
            });
            return Err((StatusCode::BAD_REQUEST, Json(error_response)));
        }
    };

    let command = TransitionCommand {
        booking_id,
        target_status: BookingMapper::to_domain_status(request.target_status),
        entered_amount,
        reason: request.reason,
        release_availability: request.release_availability,
    };

    match app_state.transition_service.apply_transition(command).await {
        Ok(booking) => {
            let success_message = success_message(&booking);
            info!("{}", success_message);
            Ok(Json(TransitionResponse {
                booking: BookingMapper::to_dto(booking),
                success_message,
            }))
        }
        Err(e) => {
            warn!("Transition on booking {} failed: {}", booking_id, e);
            Err(transition_error_response(&e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::booking::fixtures::room_booking;
    use crate::backend::domain::payment_ledger::PaymentValidationError;
    use crate::backend::storage::test_utils::TestEnvironment;
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use rust_decimal_macros::dec;
    use serde_json::json;
    use tower::util::ServiceExt; // for `oneshot`

    async fn setup_test_app() -> Router {
        let env = TestEnvironment::with_bookings(&[
            room_booking(1, BookingStatus::Pending, dec!(1000)),
            room_booking(2, BookingStatus::CheckedOut, dec!(1000)),
        ])
        .await
        .unwrap();

        router().with_state(AppState::new(env.repository))
    }

    async fn post_transition(app: Router, booking_id: i64, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/{}/transitions", booking_id))
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_reserve_booking() {
        let app = setup_test_app().await;

        let (status, body) = post_transition(
            app,
            1,
            json!({ "target_status": "reserved", "amount": "₱600.00" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let response: TransitionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.booking.status, shared::BookingStatus::Reserved);
        assert_eq!(response.booking.down_payment, Some(dec!(600)));
        assert!(response.success_message.contains("₱600.00"));
    }

    #[tokio::test]
    async fn test_reserve_below_minimum_is_422() {
        let app = setup_test_app().await;

        let (status, body) =
            post_transition(app, 1, json!({ "target_status": "reserved", "amount": "400" })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "AMOUNT_BELOW_MINIMUM");
    }

    #[tokio::test]
    async fn test_unparseable_amount_is_400() {
        let app = setup_test_app().await;

        let (status, body) = post_transition(
            app,
            1,
            json!({ "target_status": "reserved", "amount": "six hundred" }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_AMOUNT_FORMAT");
    }

    #[tokio::test]
    async fn test_blank_amount_is_required() {
        let app = setup_test_app().await;

        let (status, body) =
            post_transition(app, 1, json!({ "target_status": "reserved", "amount": "  " })).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "AMOUNT_REQUIRED");
    }

    #[tokio::test]
    async fn test_transition_from_terminal_is_409() {
        let app = setup_test_app().await;

        let (status, body) =
            post_transition(app, 2, json!({ "target_status": "checked_in" })).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "INVALID_TRANSITION");
    }

    #[tokio::test]
    async fn test_reject_without_reason_is_400() {
        let app = setup_test_app().await;

        let (status, body) = post_transition(app, 1, json!({ "target_status": "rejected" })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_REASON");
    }

    #[tokio::test]
    async fn test_unknown_booking_is_404() {
        let app = setup_test_app().await;

        let (status, body) =
            post_transition(app, 99, json!({ "target_status": "reserved", "amount": "1" })).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "BOOKING_NOT_FOUND");
    }

    #[test]
    fn test_remote_failures_map_to_bad_gateway() {
        let errors = [
            TransitionError::PaymentRecordingFailed {
                status_code: 422,
                message: "declined".to_string(),
            },
            TransitionError::StatusUpdateFailed {
                status_code: 500,
                message: "boom".to_string(),
            },
            TransitionError::NetworkOrUnknown("timeout".to_string()),
        ];

        for error in errors {
            let (status, _) = transition_error_response(&error);
            assert_eq!(status, StatusCode::BAD_GATEWAY);
        }

        let (status, Json(body)) = transition_error_response(&TransitionError::Validation(
            PaymentValidationError::AmountIsZero,
        ));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "AMOUNT_IS_ZERO");
    }
}
