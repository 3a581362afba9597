//! HTTP routes: catalog and booking CRUD, health, and the router assembly.

pub mod add_ons;
pub mod bookings;
pub mod packages;
pub mod payments;

use axum::{
    extract::State,
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::cache::CacheStats;
use crate::{auth, pricing, reports, AppState};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let private = Router::new()
        .merge(auth::routes::private_router())
        .merge(packages::router())
        .merge(add_ons::router())
        .merge(bookings::router())
        .merge(payments::router())
        .merge(pricing::router())
        .merge(reports::router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_session,
        ));

    let mut app = Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .merge(private)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        );

    if let Some(cors) = cors_layer(state.config.cors_allowed_origin.as_deref()) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let origin = match HeaderValue::from_str(origin) {
        Ok(value) => value,
        Err(e) => {
            warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            return None;
        }
    };
    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any),
    )
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}

#[cfg(test)]
mod tests;
