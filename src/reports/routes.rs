//! Report handlers

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::get,
    Extension, Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::pricing::requests::ReportQuery;
use crate::pricing::services::booking_pricing;
use crate::AppState;

use super::statement::StatementTemplate;
use super::{DateRange, RevenueReport};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/reports/revenue", get(revenue))
        .route("/bookings/:id/statement", get(statement))
}

/// Revenue over an event-date window
async fn revenue(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<RevenueReport>> {
    let range = DateRange {
        from: query.from,
        to: query.to,
    };
    if let (Some(from), Some(to)) = (range.from, range.to) {
        if from > to {
            return Err(AppError::BadRequest("'from' must not be after 'to'".to_string()));
        }
    }

    let bookings = state.bookings.list(user.owner_id).await?;
    let payments = state.payments.list(user.owner_id).await?;
    let report = RevenueReport::build(&bookings, &payments, range);
    debug!(
        "Revenue report for {}: {} bookings",
        user.owner_id, report.overall.bookings
    );
    Ok(Json(report))
}

/// Printable statement for one booking
async fn statement(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let pricing = booking_pricing(&state, user.owner_id, id).await?;
    let template = StatementTemplate::new(&pricing, &state.config.currency);
    Ok(Html(template.render()?))
}
