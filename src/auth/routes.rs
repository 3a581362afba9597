//! Sign-in / sign-out handlers.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, Result};
use crate::models::OwnerId;
use crate::AppState;

use super::{CurrentUser, SESSION_COOKIE_NAME};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub owner_id: OwnerId,
}

/// Public auth routes
pub fn router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Auth routes that need a session
pub fn private_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>)> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".to_string()));
    }

    let token = state
        .sessions
        .sign_in(&request.email, &request.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE_NAME,
        token,
        state.config.session_ttl_hours.saturating_mul(3600)
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );

    Ok((headers, Json(LoginResponse { token })))
}

async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<(StatusCode, HeaderMap)> {
    state.sessions.sign_out(&user.token).await?;
    info!("User {} signed out", user.owner_id);

    let mut headers = HeaderMap::new();
    let cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE_NAME);
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    Ok((StatusCode::NO_CONTENT, headers))
}

async fn me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        owner_id: user.owner_id,
    })
}
