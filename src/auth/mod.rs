//! Session handling: the provider seam, the route guard and the auth routes.

pub mod postgres;
pub mod routes;
#[cfg(test)]
pub mod memory;

pub use postgres::PgSessionProvider;
pub use routes::router;

use async_trait::async_trait;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::{AppError, Result};
use crate::models::OwnerId;
use crate::AppState;

pub const SESSION_COOKIE_NAME: &str = "session";

/// Current-user lookup, sign-in and sign-out.
#[async_trait]
pub trait SessionProvider: Send + Sync + 'static {
    /// Owner behind a session token, if the session is still valid.
    async fn current_user(&self, token: &str) -> Result<Option<OwnerId>>;

    /// Returns a new session token when the credentials match.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>>;

    async fn sign_out(&self, token: &str) -> Result<()>;
}

/// Authenticated caller, inserted into request extensions by [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub owner_id: OwnerId,
    pub token: String,
}

/// Session token from `Authorization: Bearer` or the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE_NAME && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Reject requests without a valid session.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = session_token(request.headers()).ok_or(AppError::Unauthorized)?;
    let owner_id = state
        .sessions
        .current_user(&token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(CurrentUser { owner_id, token });
    Ok(next.run(request).await)
}
