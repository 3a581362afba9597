//! Catalog models: pricing packages and add-on services.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::{AppError, Result};

use super::OwnerId;

/// Largest money amount accepted from a form; matches the `NUMERIC(12, 2)` columns.
pub const MAX_AMOUNT: Decimal = dec!(9999999999.99);

/// Largest package duration; matches the `NUMERIC(6, 2)` column.
pub const MAX_DURATION_HOURS: Decimal = dec!(9999.99);

/// Reject negative amounts and amounts the database cannot hold.
pub fn check_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount < Decimal::ZERO {
        return Err(AppError::BadRequest(format!("{} cannot be negative", field)));
    }
    if amount > MAX_AMOUNT {
        return Err(AppError::BadRequest(format!(
            "{} cannot exceed {}",
            field, MAX_AMOUNT
        )));
    }
    Ok(())
}

/// Flat-rate booking tier from `packages`.
///
/// `base_price` covers up to `base_guests` guests for `duration_hours` hours;
/// every guest beyond that costs `price_per_guest`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Package {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub duration_hours: Decimal,
    pub base_guests: i32,
    pub base_price: Decimal,
    pub price_per_guest: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of a package.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageDraft {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub duration_hours: Decimal,
    pub base_guests: i32,
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub price_per_guest: Decimal,
}

impl PackageDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("package name cannot be empty".to_string()));
        }
        if self.duration_hours < Decimal::ZERO || self.duration_hours > MAX_DURATION_HOURS {
            return Err(AppError::BadRequest(format!(
                "duration_hours must be between 0 and {}",
                MAX_DURATION_HOURS
            )));
        }
        if self.base_guests < 0 {
            return Err(AppError::BadRequest("base_guests cannot be negative".to_string()));
        }
        check_amount("base_price", self.base_price)?;
        check_amount("price_per_guest", self.price_per_guest)
    }
}

/// How an add-on's contribution to the booking price is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PricingModel {
    /// Unit price times the booking's guest count.
    PerGuest,
    /// Unit price times the quantity entered on the booking.
    PerUnit,
    /// Charged once per booking.
    PerEvent,
}

impl PricingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::PerGuest => "per-guest",
            PricingModel::PerUnit => "per-unit",
            PricingModel::PerEvent => "per-event",
        }
    }
}

impl fmt::Display for PricingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown pricing model '{0}'")]
pub struct UnknownPricingModel(pub String);

impl TryFrom<String> for PricingModel {
    type Error = UnknownPricingModel;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        match value.as_str() {
            "per-guest" => Ok(PricingModel::PerGuest),
            "per-unit" => Ok(PricingModel::PerUnit),
            "per-event" => Ok(PricingModel::PerEvent),
            _ => Err(UnknownPricingModel(value)),
        }
    }
}

/// Optional extra service from `add_ons`.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AddOn {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    #[sqlx(try_from = "String")]
    pub pricing_model: PricingModel,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Editable fields of an add-on.
#[derive(Debug, Clone, Deserialize)]
pub struct AddOnDraft {
    pub name: String,
    pub pricing_model: PricingModel,
    #[serde(with = "rust_decimal::serde::str")]
    pub price: Decimal,
}

impl AddOnDraft {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("add-on name cannot be empty".to_string()));
        }
        check_amount("add-on price", self.price)
    }
}
