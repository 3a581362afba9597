//! Booking and payment queries.
//!
//! A booking's add-on selections live in `booking_add_ons` and are rewritten
//! together with the booking row inside one transaction.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{
    AddOnSelection, Booking, BookingDraft, OwnerId, Payment, PaymentDraft, Selections,
};

use super::repository::{Record, Repository};

impl Record for Booking {
    type Draft = BookingDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, owner_id: OwnerId, draft: BookingDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            client_name: draft.client_name.trim().to_string(),
            event_date: draft.event_date,
            package_id: draft.package_id,
            guest_count: draft.guest_count,
            start_time: draft.start_time,
            end_time: draft.end_time,
            total_price: draft.total_price,
            price_edited: draft.price_edited,
            notes: draft.notes,
            created_at,
            add_ons: draft.add_ons,
        }
    }
}

impl Record for Payment {
    type Draft = PaymentDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn from_draft(id: Uuid, owner_id: OwnerId, draft: PaymentDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id,
            booking_id: draft.booking_id,
            amount: draft.amount,
            paid_on: draft.paid_on,
            method: draft.method.trim().to_string(),
            notes: draft.notes,
            created_at,
        }
    }
}

/// Row from `booking_add_ons`
#[derive(Debug, FromRow)]
struct SelectionRow {
    booking_id: Uuid,
    add_on_id: Uuid,
    quantity: Option<i32>,
    note: Option<String>,
}

fn group_selections(rows: Vec<SelectionRow>) -> HashMap<Uuid, Selections> {
    let mut grouped: HashMap<Uuid, Selections> = HashMap::new();
    for row in rows {
        grouped.entry(row.booking_id).or_default().insert(
            row.add_on_id,
            AddOnSelection {
                quantity: row.quantity,
                note: row.note,
            },
        );
    }
    grouped
}

async fn insert_selections(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
    selections: &Selections,
) -> Result<()> {
    for (add_on_id, selection) in selections {
        sqlx::query(
            r#"
            INSERT INTO booking_add_ons (booking_id, add_on_id, quantity, note)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(booking_id)
        .bind(add_on_id)
        .bind(selection.quantity)
        .bind(selection.note.as_deref())
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Bookings stored in `bookings` / `booking_add_ons`
#[derive(Clone)]
pub struct PgBookings {
    pool: PgPool,
}

impl PgBookings {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn selections_for(&self, booking_id: Uuid) -> Result<Selections> {
        let rows = sqlx::query_as::<_, SelectionRow>(
            r#"
            SELECT booking_id, add_on_id, quantity, note
            FROM booking_add_ons
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(group_selections(rows).remove(&booking_id).unwrap_or_default())
    }
}

#[async_trait]
impl Repository<Booking> for PgBookings {
    async fn list(&self, owner: OwnerId) -> Result<Vec<Booking>> {
        let mut bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, owner_id, client_name, event_date, package_id, guest_count,
                   start_time, end_time, total_price, price_edited, notes, created_at
            FROM bookings
            WHERE owner_id = $1
            ORDER BY event_date DESC, created_at DESC
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, SelectionRow>(
            r#"
            SELECT s.booking_id, s.add_on_id, s.quantity, s.note
            FROM booking_add_ons s
            JOIN bookings b ON b.id = s.booking_id
            WHERE b.owner_id = $1
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped = group_selections(rows);
        for booking in &mut bookings {
            booking.add_ons = grouped.remove(&booking.id).unwrap_or_default();
        }

        Ok(bookings)
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, owner_id, client_name, event_date, package_id, guest_count,
                   start_time, end_time, total_price, price_edited, notes, created_at
            FROM bookings
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        match booking {
            Some(mut booking) => {
                booking.add_ons = self.selections_for(booking.id).await?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, owner: OwnerId, draft: BookingDraft) -> Result<Booking> {
        let mut tx = self.pool.begin().await?;

        let mut booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (id, owner_id, client_name, event_date, package_id, guest_count,
                 start_time, end_time, total_price, price_edited, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, owner_id, client_name, event_date, package_id, guest_count,
                      start_time, end_time, total_price, price_edited, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(draft.client_name.trim())
        .bind(draft.event_date)
        .bind(draft.package_id)
        .bind(draft.guest_count)
        .bind(draft.start_time.as_deref())
        .bind(draft.end_time.as_deref())
        .bind(draft.total_price)
        .bind(draft.price_edited)
        .bind(draft.notes.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        insert_selections(&mut tx, booking.id, &draft.add_ons).await?;
        tx.commit().await?;

        booking.add_ons = draft.add_ons;
        Ok(booking)
    }

    async fn update(&self, owner: OwnerId, id: Uuid, draft: BookingDraft) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET client_name = $3, event_date = $4, package_id = $5, guest_count = $6,
                start_time = $7, end_time = $8, total_price = $9, price_edited = $10,
                notes = $11
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, client_name, event_date, package_id, guest_count,
                      start_time, end_time, total_price, price_edited, notes, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(draft.client_name.trim())
        .bind(draft.event_date)
        .bind(draft.package_id)
        .bind(draft.guest_count)
        .bind(draft.start_time.as_deref())
        .bind(draft.end_time.as_deref())
        .bind(draft.total_price)
        .bind(draft.price_edited)
        .bind(draft.notes.as_deref())
        .fetch_optional(&mut *tx)
        .await?;

        // Dropping the transaction rolls it back
        let Some(mut booking) = booking else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM booking_add_ons WHERE booking_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_selections(&mut tx, id, &draft.add_ons).await?;
        tx.commit().await?;

        booking.add_ons = draft.add_ons;
        Ok(Some(booking))
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        // booking_add_ons and payments cascade
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Payments stored in `payments`
#[derive(Clone)]
pub struct PgPayments {
    pool: PgPool,
}

impl PgPayments {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Payment> for PgPayments {
    async fn list(&self, owner: OwnerId) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, owner_id, booking_id, amount, paid_on, method, notes, created_at
            FROM payments
            WHERE owner_id = $1
            ORDER BY paid_on, created_at
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }

    async fn get(&self, owner: OwnerId, id: Uuid) -> Result<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, owner_id, booking_id, amount, paid_on, method, notes, created_at
            FROM payments
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn create(&self, owner: OwnerId, draft: PaymentDraft) -> Result<Payment> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (id, owner_id, booking_id, amount, paid_on, method, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner_id, booking_id, amount, paid_on, method, notes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(owner)
        .bind(draft.booking_id)
        .bind(draft.amount)
        .bind(draft.paid_on)
        .bind(draft.method.trim())
        .bind(draft.notes.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn update(&self, _owner: OwnerId, _id: Uuid, _draft: PaymentDraft) -> Result<Option<Payment>> {
        Err(AppError::BadRequest(
            "payments cannot be edited; delete and record a new one".to_string(),
        ))
    }

    async fn delete(&self, owner: OwnerId, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
