//! Booking ("event") and payment models.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::OwnerId;

/// Per-booking choice of one add-on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnSelection {
    /// Only meaningful for per-unit add-ons.
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

impl AddOnSelection {
    pub fn with_quantity(quantity: i32) -> Self {
        Self {
            quantity: Some(quantity),
            note: None,
        }
    }

    /// Quantity used for pricing: unset and negative values count as zero.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity
            .and_then(|q| u32::try_from(q).ok())
            .unwrap_or(0)
    }
}

/// Add-ons attached to a booking, keyed by add-on id.
pub type Selections = BTreeMap<Uuid, AddOnSelection>;

/// Booking from `bookings`, with its rows from `booking_add_ons`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub client_name: String,
    pub event_date: NaiveDate,
    pub package_id: Option<Uuid>,
    pub guest_count: Option<i32>,
    /// `HH:MM` local clock time.
    pub start_time: Option<String>,
    /// `HH:MM` local clock time; may be earlier than `start_time` (crosses midnight).
    pub end_time: Option<String>,
    pub total_price: Decimal,
    /// True when `total_price` was typed in rather than taken from the suggestion.
    pub price_edited: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub add_ons: Selections,
}

/// Fields written when a booking is created or updated.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub client_name: String,
    pub event_date: NaiveDate,
    pub package_id: Option<Uuid>,
    pub guest_count: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub add_ons: Selections,
    pub total_price: Decimal,
    pub price_edited: bool,
    pub notes: Option<String>,
}

/// Payment from `payments`. Payments are never edited, only deleted.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Payment {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentDraft {
    pub booking_id: Uuid,
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: String,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_quantity_defaults_to_zero() {
        assert_eq!(AddOnSelection::default().effective_quantity(), 0);
        assert_eq!(AddOnSelection::with_quantity(3).effective_quantity(), 3);
        assert_eq!(AddOnSelection::with_quantity(-4).effective_quantity(), 0);
    }
}
