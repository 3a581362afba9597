//! Persistence: owner-scoped repositories over PostgreSQL.

pub mod bookings;
#[cfg(test)]
pub mod memory;
pub mod packages;
pub mod repository;

pub use bookings::{PgBookings, PgPayments};
pub use packages::{PgAddOns, PgPackages};
pub use repository::{Record, Repository};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use crate::config::Config;

/// Open the connection pool.
pub async fn connect(config: &Config) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    info!(
        "Connected to database (max {} connections)",
        config.max_connections
    );
    Ok(pool)
}
