//! Sessions backed by the `users` and `sessions` tables.
//!
//! Passwords are stored as pgcrypto `crypt()` hashes and verified in SQL.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::config::MAX_SESSION_TTL_HOURS;
use crate::error::Result;
use crate::models::OwnerId;

use super::SessionProvider;

#[derive(Clone)]
pub struct PgSessionProvider {
    pool: PgPool,
    ttl: Duration,
}

impl PgSessionProvider {
    pub fn new(pool: PgPool, ttl_hours: i64) -> Self {
        Self {
            pool,
            ttl: Duration::hours(ttl_hours.clamp(1, MAX_SESSION_TTL_HOURS)),
        }
    }
}

#[async_trait]
impl SessionProvider for PgSessionProvider {
    async fn current_user(&self, token: &str) -> Result<Option<OwnerId>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT user_id
            FROM sessions
            WHERE token = $1
              AND expires_at > now()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user_id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Option<String>> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE email = lower($1)
              AND password_hash = crypt($2, password_hash)
            "#,
        )
        .bind(email.trim())
        .bind(password)
        .fetch_optional(&self.pool)
        .await?;

        let Some(user_id) = user_id else {
            info!("Failed sign-in for {}", email.trim());
            return Ok(None);
        };

        sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= now()")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let token = Uuid::new_v4().simple().to_string();
        sqlx::query(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(Utc::now() + self.ttl)
        .execute(&self.pool)
        .await?;

        info!("User {} signed in", user_id);
        Ok(Some(token))
    }

    async fn sign_out(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
