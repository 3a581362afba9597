//! Pricing endpoints.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::Result;
use crate::AppState;

use super::requests::QuoteRequest;
use super::responses::{BookingPricingResponse, QuoteResponse};
use super::services;

/// Pricing routes; mounted behind the session guard
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/pricing/quote", post(quote))
        .route("/api/bookings/:id/pricing", get(booking_pricing))
}

/// Price the booking form as it currently stands
async fn quote(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote = services::quote(&state, user.owner_id, request).await?;
    Ok(Json(QuoteResponse::new(&quote, &state.config.currency)))
}

async fn booking_pricing(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingPricingResponse>> {
    let pricing = services::booking_pricing(&state, user.owner_id, id).await?;
    Ok(Json(BookingPricingResponse::new(&pricing, &state.config.currency)))
}
