//! Core pricing calculation functions.
//!
//! Pure functions for booking pricing math - no database access, no logging,
//! no errors. Callers hand in whatever they already hold in memory; missing
//! packages, unknown add-on ids and malformed clock times all degrade to a
//! zero contribution instead of failing. Arithmetic saturates at
//! `Decimal::MAX` / `Decimal::MIN` rather than overflowing.

use std::collections::HashMap;

use chrono::{NaiveTime, Timelike};
use rust_decimal::prelude::*;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::models::{AddOn, AddOnSelection, Package, PricingModel, Selections};

/// Two amounts closer than this are considered equal.
pub const CURRENCY_EPSILON: Decimal = dec!(0.01);

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Add-ons available to a booking, keyed by id.
pub type AddOnCatalog = HashMap<Uuid, AddOn>;

/// Packages available to a booking, keyed by id.
pub type PackageCatalog = HashMap<Uuid, Package>;

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Pricing results are never rounded; this is for display and export only.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use salao_admin::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// One priced add-on line
#[derive(Debug, Clone, PartialEq)]
pub struct AddOnCharge {
    pub add_on_id: Uuid,
    pub name: String,
    pub pricing_model: PricingModel,
    pub unit_price: Decimal,
    /// Units billed: 1 for per-event, the entered quantity for per-unit,
    /// the guest count for per-guest.
    pub units: u32,
    pub amount: Decimal,
}

/// Itemised suggested price
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBreakdown {
    /// Guest count the figures were computed with.
    pub guests: u32,
    pub base: Decimal,
    pub excess_guests: u32,
    pub overage: Decimal,
    pub add_ons: Vec<AddOnCharge>,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn add_ons_total(&self) -> Decimal {
        saturating_sum(self.add_ons.iter().map(|c| c.amount))
    }
}

fn saturating_sum<I: IntoIterator<Item = Decimal>>(amounts: I) -> Decimal {
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(amount))
}

/// Clamp a caller-supplied count to a non-negative value.
fn clamp_count(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

/// Guest count used for proration: the booking's own count when given,
/// otherwise the package's included guests.
pub fn effective_guest_count(package: &Package, guest_count: Option<i32>) -> u32 {
    clamp_count(guest_count.unwrap_or(package.base_guests))
}

fn add_on_charge(add_on: &AddOn, selection: &AddOnSelection, guests: u32) -> AddOnCharge {
    let units = match add_on.pricing_model {
        PricingModel::PerEvent => 1,
        PricingModel::PerUnit => selection.effective_quantity(),
        PricingModel::PerGuest => guests,
    };

    AddOnCharge {
        add_on_id: add_on.id,
        name: add_on.name.clone(),
        pricing_model: add_on.pricing_model,
        unit_price: add_on.price,
        units,
        amount: add_on.price.saturating_mul(Decimal::from(units)),
    }
}

/// Itemise the suggested price of a booking.
///
/// Without a package the whole suggestion is zero, add-ons included.
/// Selections whose id is not in `catalog` are skipped.
pub fn price_breakdown(
    package: Option<&Package>,
    guest_count: Option<i32>,
    selections: &Selections,
    catalog: &AddOnCatalog,
) -> PriceBreakdown {
    let Some(package) = package else {
        return PriceBreakdown::default();
    };

    let guests = effective_guest_count(package, guest_count);
    let excess_guests = guests.saturating_sub(clamp_count(package.base_guests));
    let overage = Decimal::from(excess_guests).saturating_mul(package.price_per_guest);

    let add_ons: Vec<AddOnCharge> = selections
        .iter()
        .filter_map(|(id, selection)| {
            catalog
                .get(id)
                .map(|add_on| add_on_charge(add_on, selection, guests))
        })
        .collect();

    let add_ons_total = saturating_sum(add_ons.iter().map(|c| c.amount));

    PriceBreakdown {
        guests,
        base: package.base_price,
        excess_guests,
        overage,
        total: package
            .base_price
            .saturating_add(overage)
            .saturating_add(add_ons_total),
        add_ons,
    }
}

/// Suggested total for a booking: package base + per-guest overage + add-ons.
pub fn compute_suggested_price(
    package: Option<&Package>,
    guest_count: Option<i32>,
    selections: &Selections,
    catalog: &AddOnCatalog,
) -> Decimal {
    price_breakdown(package, guest_count, selections, catalog).total
}

/// Actual event length compared to the package duration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationDelta {
    pub actual_hours: Decimal,
    /// Whole hours past the package duration, rounded up.
    pub extra_hours: u32,
    /// Whole hours short of the package duration, rounded up.
    pub shortfall_hours: u32,
}

impl DurationDelta {
    /// Human readable warning, if the event length differs from the package.
    pub fn warning(&self) -> Option<String> {
        if self.extra_hours > 0 {
            Some(format!(
                "Event runs {} hour(s) longer than the package duration",
                self.extra_hours
            ))
        } else if self.shortfall_hours > 0 {
            Some(format!(
                "Event is {} hour(s) shorter than the package duration",
                self.shortfall_hours
            ))
        } else {
            None
        }
    }
}

/// Parse an `HH:MM` clock value into minutes since midnight.
pub fn parse_clock(value: &str) -> Option<i64> {
    let time = NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()?;
    Some(i64::from(time.hour() * 60 + time.minute()))
}

fn whole_hours(diff: Decimal) -> u32 {
    diff.max(Decimal::ZERO).ceil().to_u32().unwrap_or(u32::MAX)
}

/// Compare the scheduled length of an event to its package duration.
///
/// An end time at or before the start time is read as crossing midnight once.
/// Advisory only: the result never feeds into the price.
pub fn compute_duration_delta(
    package: Option<&Package>,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> DurationDelta {
    let (Some(package), Some(start), Some(end)) = (
        package,
        start_time.and_then(parse_clock),
        end_time.and_then(parse_clock),
    ) else {
        return DurationDelta::default();
    };

    let end = if end <= start { end + MINUTES_PER_DAY } else { end };
    let actual_hours = Decimal::from(end - start) / dec!(60);

    DurationDelta {
        actual_hours,
        extra_hours: whole_hours(actual_hours.saturating_sub(package.duration_hours)),
        shortfall_hours: whole_hours(package.duration_hours.saturating_sub(actual_hours)),
    }
}

/// Paid / unpaid state of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Unpaid,
    Overpaid,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partially paid",
            PaymentStatus::Unpaid => "Unpaid",
            PaymentStatus::Overpaid => "Overpaid",
        }
    }
}

/// Payments received against a booking's total
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciliation {
    pub total_price: Decimal,
    pub total_received: Decimal,
    /// `total_price - total_received`; negative when overpaid.
    pub balance: Decimal,
    pub is_fully_paid: bool,
}

impl Reconciliation {
    /// Amount still owed, never negative.
    pub fn amount_owed(&self) -> Decimal {
        self.balance.max(Decimal::ZERO)
    }

    pub fn status(&self) -> PaymentStatus {
        if self.is_fully_paid {
            PaymentStatus::Paid
        } else if self.balance < Decimal::ZERO {
            PaymentStatus::Overpaid
        } else if self.total_received > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Unpaid
        }
    }
}

/// Sum payments and compare them to the booking total.
///
/// Negative amounts count as zero.
pub fn reconcile_payments<I>(total_price: Decimal, payment_amounts: I) -> Reconciliation
where
    I: IntoIterator<Item = Decimal>,
{
    let total_received = saturating_sum(
        payment_amounts
            .into_iter()
            .map(|amount| amount.max(Decimal::ZERO)),
    );
    let balance = total_price.saturating_sub(total_received);

    Reconciliation {
        total_price,
        total_received,
        balance,
        is_fully_paid: balance.abs() < CURRENCY_EPSILON,
    }
}
