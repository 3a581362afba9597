//! Printable booking statement

use askama::Template;

use crate::pricing::format_money;
use crate::pricing::services::BookingPricing;

/// One priced line of the statement
pub struct StatementLine {
    pub label: String,
    pub detail: String,
    pub amount: String,
}

pub struct StatementPayment {
    pub paid_on: String,
    pub method: String,
    pub amount: String,
}

/// Booking statement template
#[derive(Template)]
#[template(path = "bookings/statement.html")]
pub struct StatementTemplate {
    pub client_name: String,
    pub event_date: String,
    pub package_name: String,
    pub schedule: String,
    pub lines: Vec<StatementLine>,
    pub suggested_price: String,
    pub total_price: String,
    pub price_edited: bool,
    pub payments: Vec<StatementPayment>,
    pub total_received: String,
    pub balance: String,
    pub status: &'static str,
    pub warning: String,
    pub notes: String,
    pub has_package: bool,
    pub has_schedule: bool,
    pub has_payments: bool,
    pub has_warning: bool,
    pub has_notes: bool,
}

impl StatementTemplate {
    pub fn new(pricing: &BookingPricing, currency: &str) -> Self {
        let booking = &pricing.booking;
        let breakdown = &pricing.quote.breakdown;
        let reconciliation = &pricing.quote.reconciliation;
        let money = |amount| format_money(amount, currency);

        let mut lines = Vec::new();
        if let Some(name) = &pricing.package_name {
            lines.push(StatementLine {
                label: name.clone(),
                detail: format!("{} guests", breakdown.guests),
                amount: money(breakdown.base),
            });
        }
        if breakdown.excess_guests > 0 {
            lines.push(StatementLine {
                label: "Extra guests".to_string(),
                detail: breakdown.excess_guests.to_string(),
                amount: money(breakdown.overage),
            });
        }
        for charge in &breakdown.add_ons {
            lines.push(StatementLine {
                label: charge.name.clone(),
                detail: format!("{} x {}", charge.units, money(charge.unit_price)),
                amount: money(charge.amount),
            });
        }

        let schedule = match (&booking.start_time, &booking.end_time) {
            (Some(start), Some(end)) => format!("{} - {}", start, end),
            _ => String::new(),
        };
        let warning = pricing.quote.duration.warning().unwrap_or_default();
        let notes = booking.notes.clone().unwrap_or_default();

        Self {
            client_name: booking.client_name.clone(),
            event_date: booking.event_date.format("%d/%m/%Y").to_string(),
            package_name: pricing.package_name.clone().unwrap_or_default(),
            has_schedule: !schedule.is_empty(),
            schedule,
            lines,
            suggested_price: money(pricing.quote.price.auto_price),
            total_price: money(reconciliation.total_price),
            price_edited: booking.price_edited,
            payments: pricing
                .payments
                .iter()
                .map(|p| StatementPayment {
                    paid_on: p.paid_on.format("%d/%m/%Y").to_string(),
                    method: p.method.clone(),
                    amount: money(p.amount),
                })
                .collect(),
            total_received: money(reconciliation.total_received),
            balance: money(reconciliation.balance),
            status: reconciliation.status().label(),
            has_warning: !warning.is_empty(),
            warning,
            has_notes: !notes.is_empty(),
            notes,
            has_package: pricing.package_name.is_some(),
            has_payments: !pricing.payments.is_empty(),
        }
    }
}
