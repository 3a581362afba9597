//! Booking form price state.
//!
//! The form keeps the engine's suggestion and the user's typed price apart.
//! Recalculating only ever touches the suggestion; which of the two is the
//! booking's price is decided here, not in the calculators.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Booking, Package, Selections};

use super::calculators::{
    compute_duration_delta, price_breakdown, AddOnCatalog, DurationDelta, PackageCatalog,
    PriceBreakdown,
};

/// Suggested price plus an optional manual override.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceField {
    pub auto_price: Decimal,
    pub user_price: Option<Decimal>,
}

impl PriceField {
    pub fn automatic(auto_price: Decimal) -> Self {
        Self {
            auto_price,
            user_price: None,
        }
    }

    /// Rebuild the field from a stored booking price and its edited flag.
    pub fn from_stored(stored_price: Decimal, price_edited: bool, auto_price: Decimal) -> Self {
        Self {
            auto_price,
            user_price: price_edited.then_some(stored_price),
        }
    }

    /// The price the booking should carry.
    pub fn current(&self) -> Decimal {
        self.user_price.unwrap_or(self.auto_price)
    }

    pub fn is_manual(&self) -> bool {
        self.user_price.is_some()
    }

    pub fn with_auto(self, auto_price: Decimal) -> Self {
        Self { auto_price, ..self }
    }

    pub fn override_with(self, price: Decimal) -> Self {
        Self {
            user_price: Some(price),
            ..self
        }
    }

    pub fn clear_override(self) -> Self {
        Self {
            user_price: None,
            ..self
        }
    }
}

/// Pricing-relevant inputs of the booking form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub package_id: Option<Uuid>,
    pub guest_count: Option<i32>,
    pub selections: Selections,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub price: PriceField,
}

impl BookingForm {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            package_id: booking.package_id,
            guest_count: booking.guest_count,
            selections: booking.add_ons.clone(),
            start_time: booking.start_time.clone(),
            end_time: booking.end_time.clone(),
            price: PriceField::from_stored(booking.total_price, booking.price_edited, booking.total_price),
        }
    }

    /// Selected package, or `None` when unset or no longer in the catalog.
    pub fn package<'a>(&self, packages: &'a PackageCatalog) -> Option<&'a Package> {
        self.package_id.and_then(|id| packages.get(&id))
    }

    /// Re-run the engine and refresh the suggested price.
    pub fn recalculate(&mut self, packages: &PackageCatalog, catalog: &AddOnCatalog) -> PriceBreakdown {
        let breakdown = price_breakdown(
            self.package(packages),
            self.guest_count,
            &self.selections,
            catalog,
        );
        self.price = self.price.with_auto(breakdown.total);
        breakdown
    }

    pub fn duration_delta(&self, packages: &PackageCatalog) -> DurationDelta {
        compute_duration_delta(
            self.package(packages),
            self.start_time.as_deref(),
            self.end_time.as_deref(),
        )
    }
}
