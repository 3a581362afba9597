//! Revenue report and printable booking statement.

pub mod routes;
pub mod statement;

pub use routes::router;

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Booking, Payment};
use crate::pricing::{reconcile_payments, PaymentStatus};

/// Inclusive event-date window; an open end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Contracted, received and outstanding amounts over a set of bookings
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueTotals {
    pub bookings: u32,
    #[serde(with = "rust_decimal::serde::str")]
    pub contracted: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub received: Decimal,
    /// Sum of what each booking still owes; overpayments do not offset it.
    #[serde(with = "rust_decimal::serde::str")]
    pub outstanding: Decimal,
}

/// Totals for one calendar month, keyed `YYYY-MM`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub month: String,
    #[serde(flatten)]
    pub totals: RevenueTotals,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub paid: u32,
    pub partial: u32,
    pub unpaid: u32,
    pub overpaid: u32,
}

impl StatusCounts {
    fn record(&mut self, status: PaymentStatus) {
        match status {
            PaymentStatus::Paid => self.paid += 1,
            PaymentStatus::Partial => self.partial += 1,
            PaymentStatus::Unpaid => self.unpaid += 1,
            PaymentStatus::Overpaid => self.overpaid += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueReport {
    pub range: DateRange,
    pub months: Vec<MonthlyRevenue>,
    pub overall: RevenueTotals,
    pub statuses: StatusCounts,
}

impl RevenueReport {
    /// Aggregate the bookings whose event date falls in `range`.
    ///
    /// Each booking is reconciled against its stored `total_price` with the
    /// payments that reference it; payments of other bookings are ignored.
    pub fn build(bookings: &[Booking], payments: &[Payment], range: DateRange) -> Self {
        let mut received_by_booking: HashMap<Uuid, Vec<Decimal>> = HashMap::new();
        for payment in payments {
            received_by_booking
                .entry(payment.booking_id)
                .or_default()
                .push(payment.amount);
        }

        let mut months: BTreeMap<String, RevenueTotals> = BTreeMap::new();
        let mut overall = RevenueTotals::default();
        let mut statuses = StatusCounts::default();

        for booking in bookings.iter().filter(|b| range.contains(b.event_date)) {
            let amounts = received_by_booking
                .get(&booking.id)
                .map(|a| a.as_slice())
                .unwrap_or_default();
            let reconciliation = reconcile_payments(booking.total_price, amounts.iter().copied());
            statuses.record(reconciliation.status());

            let month = months
                .entry(booking.event_date.format("%Y-%m").to_string())
                .or_default();
            for totals in [month, &mut overall] {
                totals.bookings += 1;
                totals.contracted = totals.contracted.saturating_add(reconciliation.total_price);
                totals.received = totals.received.saturating_add(reconciliation.total_received);
                totals.outstanding = totals.outstanding.saturating_add(reconciliation.amount_owed());
            }
        }

        Self {
            range,
            months: months
                .into_iter()
                .map(|(month, totals)| MonthlyRevenue { month, totals })
                .collect(),
            overall,
            statuses,
        }
    }
}
