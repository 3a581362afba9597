//! Booking handlers
//!
//! Create and update run the request through the booking form, so the stored
//! `total_price` is either the fresh suggestion or the price the user typed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::Booking;
use crate::pricing::requests::BookingRequest;
use crate::pricing::services::booking_draft;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list).post(create))
        .route("/api/bookings/:id", get(show).put(update).delete(remove))
}

/// Bookings by event date
async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Booking>>> {
    let mut bookings = state.bookings.list(user.owner_id).await?;
    bookings.sort_by(|a, b| (a.event_date, &a.start_time).cmp(&(b.event_date, &b.start_time)));
    Ok(Json(bookings))
}

async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>> {
    let booking = state
        .bookings
        .get(user.owner_id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(booking))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<Booking>)> {
    let draft = booking_draft(&state, user.owner_id, request, None).await?;
    let booking = state.bookings.create(user.owner_id, draft).await?;
    info!(
        "Booking {} created for {} at {}",
        booking.id, booking.event_date, booking.total_price
    );
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<BookingRequest>,
) -> Result<Json<Booking>> {
    let existing = state
        .bookings
        .get(user.owner_id, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let draft = booking_draft(&state, user.owner_id, request, Some(&existing)).await?;
    let booking = state
        .bookings
        .update(user.owner_id, id, draft)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(booking))
}

/// Deleting a booking deletes its payments with it (`ON DELETE CASCADE`).
async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.bookings.delete(user.owner_id, id).await? {
        return Err(AppError::NotFound);
    }
    info!("Booking {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
