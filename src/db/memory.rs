//! In-memory repository used by tests.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Booking, BookingDraft, OwnerId, Payment};

use super::repository::{Record, Repository};

pub struct MemoryRepository<T> {
    rows: RwLock<Vec<T>>,
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T> MemoryRepository<T> {
    /// Drop every row matching `predicate`.
    pub async fn remove_where<F>(&self, predicate: F)
    where
        F: Fn(&T) -> bool,
    {
        self.rows.write().await.retain(|r| !predicate(r));
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MemoryRepository<T> {
    async fn list(&self, owner: OwnerId) -> Result<Vec<T>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|r| r.owner_id() == owner).cloned().collect())
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<T>> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|r| r.owner_id() == owner && r.id() == id)
            .cloned())
    }

    async fn create(&self, owner: OwnerId, draft: T::Draft) -> Result<T> {
        let record = T::from_draft(Uuid::new_v4(), owner, draft, Utc::now());
        self.rows.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(&self, owner: OwnerId, id: Uuid, draft: T::Draft) -> Result<Option<T>> {
        let mut rows = self.rows.write().await;
        let Some(slot) = rows
            .iter_mut()
            .find(|r| r.owner_id() == owner && r.id() == id)
        else {
            return Ok(None);
        };
        *slot = T::from_draft(id, owner, draft, slot.created_at());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.owner_id() == owner && r.id() == id));
        Ok(rows.len() < before)
    }
}

/// Bookings whose delete also removes their payments, as the
/// `payments.booking_id` foreign key does in Postgres.
pub struct MemoryBookings {
    bookings: MemoryRepository<Booking>,
    payments: Arc<MemoryRepository<Payment>>,
}

impl MemoryBookings {
    pub fn new(payments: Arc<MemoryRepository<Payment>>) -> Self {
        Self {
            bookings: MemoryRepository::default(),
            payments,
        }
    }
}

#[async_trait]
impl Repository<Booking> for MemoryBookings {
    async fn list(&self, owner: OwnerId) -> Result<Vec<Booking>> {
        self.bookings.list(owner).await
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<Booking>> {
        self.bookings.get(owner, id).await
    }

    async fn create(&self, owner: OwnerId, draft: BookingDraft) -> Result<Booking> {
        self.bookings.create(owner, draft).await
    }

    async fn update(&self, owner: OwnerId, id: Uuid, draft: BookingDraft) -> Result<Option<Booking>> {
        self.bookings.update(owner, id, draft).await
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        let deleted = self.bookings.delete(owner, id).await?;
        if deleted {
            self.payments
                .remove_where(|p| p.owner_id == owner && p.booking_id == id)
                .await;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddOn, AddOnDraft, PricingModel};
    use rust_decimal_macros::dec;

    fn draft(name: &str) -> AddOnDraft {
        AddOnDraft {
            name: name.to_string(),
            pricing_model: PricingModel::PerEvent,
            price: dec!(100),
        }
    }

    #[tokio::test]
    async fn test_rows_are_scoped_to_owner() {
        let repo = MemoryRepository::<AddOn>::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        let created = repo.create(alice, draft("DJ")).await.unwrap();
        repo.create(bob, draft("Buffet")).await.unwrap();

        assert_eq!(repo.list(alice).await.unwrap().len(), 1);
        assert!(repo.get(bob, created.id).await.unwrap().is_none());
        assert!(repo.update(bob, created.id, draft("Stolen")).await.unwrap().is_none());
        assert!(!repo.delete(bob, created.id).await.unwrap());

        let updated = repo.update(alice, created.id, draft("  DJ + lights ")).await.unwrap().unwrap();
        assert_eq!(updated.name, "DJ + lights");
        assert_eq!(updated.created_at, created.created_at);

        assert!(repo.delete(alice, created.id).await.unwrap());
        assert!(repo.list(alice).await.unwrap().is_empty());
    }
}
