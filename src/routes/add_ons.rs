//! Add-on catalog handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::{AppError, Result};
use crate::models::{AddOn, AddOnDraft};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/add-ons", get(list).post(create))
        .route("/api/add-ons/:id", put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<AddOn>>> {
    let mut add_ons = state.add_ons.list(user.owner_id).await?;
    add_ons.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(add_ons))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<AddOnDraft>,
) -> Result<(StatusCode, Json<AddOn>)> {
    draft.validate()?;
    let add_on = state.add_ons.create(user.owner_id, draft).await?;
    state.cache.invalidate_owner(user.owner_id).await;
    info!("Add-on {} created ({})", add_on.id, add_on.pricing_model);
    Ok((StatusCode::CREATED, Json(add_on)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<AddOnDraft>,
) -> Result<Json<AddOn>> {
    draft.validate()?;
    let add_on = state
        .add_ons
        .update(user.owner_id, id, draft)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_owner(user.owner_id).await;
    Ok(Json(add_on))
}

async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.add_ons.delete(user.owner_id, id).await? {
        return Err(AppError::NotFound);
    }
    state.cache.invalidate_owner(user.owner_id).await;
    info!("Add-on {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
