//! Package catalog handlers

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
use crate::models::{Package, PackageDraft};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/packages", get(list).post(create))
        .route("/api/packages/:id", put(update).delete(remove))
}

async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Package>>> {
    let mut packages = state.packages.list(user.owner_id).await?;
    packages.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(Json(packages))
}

async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<PackageDraft>,
) -> Result<(StatusCode, Json<Package>)> {
    draft.validate()?;
    let package = state.packages.create(user.owner_id, draft).await?;
    state.cache.invalidate_owner(user.owner_id).await;
    info!("Package {} created", package.id);
    Ok((StatusCode::CREATED, Json(package)))
}

async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(draft): Json<PackageDraft>,
) -> Result<Json<Package>> {
    draft.validate()?;
    let package = state
        .packages
        .update(user.owner_id, id, draft)
        .await?
        .ok_or(AppError::NotFound)?;
    state.cache.invalidate_owner(user.owner_id).await;
    Ok(Json(package))
}

/// Bookings keep the dangling id; pricing treats it as no package.
async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !state.packages.delete(user.owner_id, id).await? {
        return Err(AppError::NotFound);
    }
    state.cache.invalidate_owner(user.owner_id).await;
    info!("Package {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}
