//! Payment handlers, nested under their booking

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Extension, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{Payment, PaymentDraft};
use crate::pricing::requests::PaymentRequest;
use crate::pricing::services::payments_for;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings/:id/payments", get(list).post(create))
        .route("/api/bookings/:id/payments/:payment_id", delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Vec<Payment>>> {
    ensure_booking(&state, &user, booking_id).await?;
    Ok(Json(payments_for(&state, user.owner_id, booking_id).await?))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<PaymentRequest>,
) -> Result<(StatusCode, Json<Payment>)> {
    request.validate()?;
    ensure_booking(&state, &user, booking_id).await?;

    let payment = state
        .payments
        .create(
            user.owner_id,
            PaymentDraft {
                booking_id,
                amount: request.amount,
                paid_on: request.paid_on,
                method: request.method.trim().to_string(),
                notes: request.notes.filter(|n| !n.trim().is_empty()),
            },
        )
        .await?;
    info!("Payment of {} recorded for booking {}", payment.amount, booking_id);
    Ok((StatusCode::CREATED, Json(payment)))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path((booking_id, payment_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode> {
    let payment = state
        .payments
        .get(user.owner_id, payment_id)
        .await?
        .filter(|p| p.booking_id == booking_id)
        .ok_or(AppError::NotFound)?;

    state.payments.delete(user.owner_id, payment.id).await?;
    info!("Payment {} deleted from booking {}", payment.id, booking_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_booking(state: &AppState, user: &CurrentUser, booking_id: Uuid) -> Result<()> {
    state
        .bookings
        .get(user.owner_id, booking_id)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}
