//! Package and add-on catalog queries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AddOn, AddOnDraft, OwnerId, Package, PackageDraft};

use super::repository::{Record, Repository};

impl Record for Package {
    type Draft = PackageDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, owner_id: OwnerId, draft: PackageDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: draft.name.trim().to_string(),
            duration_hours: draft.duration_hours,
            base_guests: draft.base_guests,
            base_price: draft.base_price,
            price_per_guest: draft.price_per_guest,
            created_at,
        }
    }
}

impl Record for AddOn {
    type Draft = AddOnDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, owner_id: OwnerId, draft: AddOnDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            name: draft.name.trim().to_string(),
            pricing_model: draft.pricing_model,
            price: draft.price,
            created_at,
        }
    }
}

/// Packages stored in `packages`
#[derive(Clone)]
pub struct PgPackages {
    pool: PgPool,
}

impl PgPackages {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Package> for PgPackages {
    async fn list(&self, owner: OwnerId) -> Result<Vec<Package>> {
        let packages = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, owner_id, name, duration_hours, base_guests,
                   base_price, price_per_guest, created_at
            FROM packages
            WHERE owner_id = $1
            ORDER BY name
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(packages)
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            SELECT id, owner_id, name, duration_hours, base_guests,
                   base_price, price_per_guest, created_at
            FROM packages
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    async fn create(&self, owner: OwnerId, draft: PackageDraft) -> Result<Package> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            INSERT INTO packages
                (id, owner_id, name, duration_hours, base_guests, base_price, price_per_guest)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, name, duration_hours, base_guests,
                      base_price, price_per_guest, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(draft.name.trim())
        .bind(draft.duration_hours)
        .bind(draft.base_guests)
        .bind(draft.base_price)
        .bind(draft.price_per_guest)
        .fetch_one(&self.pool)
        .await?;

        Ok(package)
    }

    async fn update(&self, owner: OwnerId, id: Uuid, draft: PackageDraft) -> Result<Option<Package>> {
        let package = sqlx::query_as::<_, Package>(
            r#"
            UPDATE packages
            SET name = $3, duration_hours = $4, base_guests = $5,
                base_price = $6, price_per_guest = $7
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, name, duration_hours, base_guests,
                      base_price, price_per_guest, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(draft.name.trim())
        .bind(draft.duration_hours)
        .bind(draft.base_guests)
        .bind(draft.base_price)
        .bind(draft.price_per_guest)
        .fetch_optional(&self.pool)
        .await?;

        Ok(package)
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM packages WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Add-ons stored in `add_ons`
#[derive(Clone)]
pub struct PgAddOns {
    pool: PgPool,
}

impl PgAddOns {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<AddOn> for PgAddOns {
    async fn list(&self, owner: OwnerId) -> Result<Vec<AddOn>> {
        let add_ons = sqlx::query_as::<_, AddOn>(
            r#"
            SELECT id, owner_id, name, pricing_model, price, created_at
            FROM add_ons
            WHERE owner_id = $1
            ORDER BY name
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(add_ons)
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<AddOn>> {
        let add_on = sqlx::query_as::<_, AddOn>(
            r#"
            SELECT id, owner_id, name, pricing_model, price, created_at
            FROM add_ons
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(add_on)
    }

    async fn create(&self, owner: OwnerId, draft: AddOnDraft) -> Result<AddOn> {
        let add_on = sqlx::query_as::<_, AddOn>(
            r#"
            INSERT INTO add_ons (id, owner_id, name, pricing_model, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, owner_id, name, pricing_model, price, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(draft.name.trim())
        .bind(draft.pricing_model.as_str())
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(add_on)
    }

    async fn update(&self, owner: OwnerId, id: Uuid, draft: AddOnDraft) -> Result<Option<AddOn>> {
        let add_on = sqlx::query_as::<_, AddOn>(
            r#"
            UPDATE add_ons
            SET name = $3, pricing_model = $4, price = $5
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, name, pricing_model, price, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(draft.name.trim())
        .bind(draft.pricing_model.as_str())
        .bind(draft.price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(add_on)
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM add_ons WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
