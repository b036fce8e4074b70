use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info};

use crate::backend::domain::commands::analytics::RevenueQuery;
use crate::backend::io::rest::mappers::booking_mapper::BookingMapper;
use crate::backend::AppState;
use shared::RevenueSummaryResponse;

/// Create the analytics API router
pub fn router() -> Router<AppState> {
    Router::new().route("/revenue", get(get_revenue_summary))
}

#[derive(Debug, Deserialize)]
pub struct RevenueParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Revenue collected and still owed for bookings checking in within a range
pub async fn get_revenue_summary(
    State(app_state): State<AppState>,
    Query(params): Query<RevenueParams>,
) -> Result<Json<RevenueSummaryResponse>, (StatusCode, Json<Value>)> {
    info!("GET /api/analytics/revenue - params: {:?}", params);

    if params.from > params.to {
        let error_response = serde_json::json!({
            "error": "'from' must not be after 'to'",
            "code": "INVALID_DATE_RANGE"
        });
        return Err((StatusCode::BAD_REQUEST, Json(error_response)));
    }

    let query = RevenueQuery {
        from: params.from,
        to: params.to,
    };
    match app_state.revenue_service.revenue_summary(query).await {
        Ok(summary) => Ok(Json(BookingMapper::to_revenue_response(summary))),
        Err(e) => {
            error!("Failed to compute revenue summary: {}", e);
            let error_response = serde_json::json!({
                "error": "Failed to compute revenue summary",
                "code": "STORAGE_ERROR"
            });
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}
