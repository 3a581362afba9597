//! Salon booking admin: pricing engine and the HTTP service around it.

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;
pub mod reports;
pub mod routes;
#[cfg(test)]
pub mod test_support;

use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{PgSessionProvider, SessionProvider};
use crate::cache::AppCache;
use crate::config::Config;
use crate::db::{PgAddOns, PgBookings, PgPackages, PgPayments, Repository};
use crate::models::{AddOn, Booking, Package, Payment};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub packages: Arc<dyn Repository<Package>>,
    pub add_ons: Arc<dyn Repository<AddOn>>,
    pub bookings: Arc<dyn Repository<Booking>>,
    pub payments: Arc<dyn Repository<Payment>>,
    pub sessions: Arc<dyn SessionProvider>,
    pub cache: AppCache,
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self {
            packages: Arc::new(PgPackages::new(pool.clone())),
            add_ons: Arc::new(PgAddOns::new(pool.clone())),
            bookings: Arc::new(PgBookings::new(pool.clone())),
            payments: Arc::new(PgPayments::new(pool.clone())),
            sessions: Arc::new(PgSessionProvider::new(pool, config.session_ttl_hours)),
            cache: AppCache::new(config.catalog_cache_ttl),
            config: Arc::new(config),
        }
    }
}
