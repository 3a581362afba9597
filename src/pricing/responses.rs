//! Response DTOs for pricing endpoints.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Payment, PricingModel};

use super::calculators::{
    AddOnCharge, DurationDelta, PaymentStatus, PriceBreakdown, Reconciliation,
};
use super::format::format_money;
use super::services::{BookingPricing, Quote};

/// Money value for JSON responses
#[derive(Debug, Clone, Serialize)]
pub struct MoneyResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub currency: String,
    /// Locale formatted amount, e.g. `R$ 1.234,56`.
    pub display: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
            display: format_money(amount, currency),
        }
    }
}

/// One add-on line of the breakdown
#[derive(Debug, Serialize)]
pub struct AddOnChargeResponse {
    pub add_on_id: Uuid,
    pub name: String,
    pub pricing_model: PricingModel,
    pub unit_price: MoneyResponse,
    pub units: u32,
    pub amount: MoneyResponse,
}

impl AddOnChargeResponse {
    fn new(charge: &AddOnCharge, currency: &str) -> Self {
        Self {
            add_on_id: charge.add_on_id,
            name: charge.name.clone(),
            pricing_model: charge.pricing_model,
            unit_price: MoneyResponse::new(charge.unit_price, currency),
            units: charge.units,
            amount: MoneyResponse::new(charge.amount, currency),
        }
    }
}

/// Itemised suggested price
#[derive(Debug, Serialize)]
pub struct BreakdownResponse {
    pub guests: u32,
    pub base: MoneyResponse,
    pub excess_guests: u32,
    pub overage: MoneyResponse,
    pub add_ons: Vec<AddOnChargeResponse>,
    pub total: MoneyResponse,
}

impl BreakdownResponse {
    pub fn new(breakdown: &PriceBreakdown, currency: &str) -> Self {
        Self {
            guests: breakdown.guests,
            base: MoneyResponse::new(breakdown.base, currency),
            excess_guests: breakdown.excess_guests,
            overage: MoneyResponse::new(breakdown.overage, currency),
            add_ons: breakdown
                .add_ons
                .iter()
                .map(|c| AddOnChargeResponse::new(c, currency))
                .collect(),
            total: MoneyResponse::new(breakdown.total, currency),
        }
    }
}

/// Event length compared to the package
#[derive(Debug, Serialize)]
pub struct DurationResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub actual_hours: Decimal,
    pub extra_hours: u32,
    pub shortfall_hours: u32,
    pub warning: Option<String>,
}

impl From<&DurationDelta> for DurationResponse {
    fn from(delta: &DurationDelta) -> Self {
        Self {
            actual_hours: delta.actual_hours.normalize(),
            extra_hours: delta.extra_hours,
            shortfall_hours: delta.shortfall_hours,
            warning: delta.warning(),
        }
    }
}

/// Payments against the booking total
#[derive(Debug, Serialize)]
pub struct ReconciliationResponse {
    pub total_price: MoneyResponse,
    pub total_received: MoneyResponse,
    /// Signed: negative when overpaid.
    pub balance: MoneyResponse,
    pub amount_owed: MoneyResponse,
    pub is_fully_paid: bool,
    pub status: PaymentStatus,
}

impl ReconciliationResponse {
    pub fn new(reconciliation: &Reconciliation, currency: &str) -> Self {
        Self {
            total_price: MoneyResponse::new(reconciliation.total_price, currency),
            total_received: MoneyResponse::new(reconciliation.total_received, currency),
            balance: MoneyResponse::new(reconciliation.balance, currency),
            amount_owed: MoneyResponse::new(reconciliation.amount_owed(), currency),
            is_fully_paid: reconciliation.is_fully_paid,
            status: reconciliation.status(),
        }
    }
}

/// Response for a quote or a stored booking's pricing
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub breakdown: BreakdownResponse,
    pub suggested_price: MoneyResponse,
    pub current_price: MoneyResponse,
    pub price_edited: bool,
    pub duration: DurationResponse,
    pub reconciliation: ReconciliationResponse,
}

impl QuoteResponse {
    pub fn new(quote: &Quote, currency: &str) -> Self {
        Self {
            breakdown: BreakdownResponse::new(&quote.breakdown, currency),
            suggested_price: MoneyResponse::new(quote.price.auto_price, currency),
            current_price: MoneyResponse::new(quote.reconciliation.total_price, currency),
            price_edited: quote.price.is_manual(),
            duration: DurationResponse::from(&quote.duration),
            reconciliation: ReconciliationResponse::new(&quote.reconciliation, currency),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingPricingResponse {
    pub booking_id: Uuid,
    pub client_name: String,
    #[serde(flatten)]
    pub quote: QuoteResponse,
    pub payments: Vec<Payment>,
}

impl BookingPricingResponse {
    pub fn new(pricing: &BookingPricing, currency: &str) -> Self {
        Self {
            booking_id: pricing.booking.id,
            client_name: pricing.booking.client_name.clone(),
            quote: QuoteResponse::new(&pricing.quote, currency),
            payments: pricing.payments.clone(),
        }
    }
}
