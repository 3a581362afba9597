//! Generic owner-scoped repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::OwnerId;

/// A row that belongs to exactly one owner.
pub trait Record: Clone + Send + Sync + 'static {
    /// Fields supplied on create and update.
    type Draft: Send + Sync + 'static;

    fn id(&self) -> Uuid;
    fn owner_id(&self) -> OwnerId;
    fn created_at(&self) -> DateTime<Utc>;

    /// Build the stored record from a draft.
    fn from_draft(id: Uuid, owner_id: OwnerId, draft: Self::Draft, created_at: DateTime<Utc>) -> Self;
}

/// CRUD access to one collection. Every call only sees the owner's rows.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync + 'static {
    async fn list(&self, owner: OwnerId) -> Result<Vec<T>>;

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<T>>;

    async fn create(&self, owner: OwnerId, draft: T::Draft) -> Result<T>;

    /// Returns `None` when no row with `id` belongs to `owner`.
    async fn update(&self, owner: OwnerId, id: Uuid, draft: T::Draft) -> Result<Option<T>>;

    /// Returns `true` if a row was deleted.
    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool>;
}
