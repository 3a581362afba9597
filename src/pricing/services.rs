//! Pricing service functions with repository access.
//!
//! These load the owner's catalog (through the cache) and the booking's
//! payments, then hand everything to the pure calculators.

use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{Booking, BookingDraft, OwnerId, Payment};
use crate::AppState;

use super::calculators::{
    reconcile_payments, AddOnCatalog, DurationDelta, PackageCatalog, PriceBreakdown,
    Reconciliation,
};
use super::form::{BookingForm, PriceField};
use super::requests::{into_selections, BookingRequest, QuoteRequest};

/// Everything the booking form shows about price
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub breakdown: PriceBreakdown,
    pub price: PriceField,
    pub duration: DurationDelta,
    pub reconciliation: Reconciliation,
}

/// Price a form against a catalog and reconcile payments against `total_price`.
pub fn evaluate<I>(
    form: &mut BookingForm,
    packages: &PackageCatalog,
    catalog: &AddOnCatalog,
    total_price: Option<Decimal>,
    payment_amounts: I,
) -> Quote
where
    I: IntoIterator<Item = Decimal>,
{
    let breakdown = form.recalculate(packages, catalog);
    let duration = form.duration_delta(packages);
    let reconciliation = reconcile_payments(
        total_price.unwrap_or_else(|| form.price.current()),
        payment_amounts,
    );

    Quote {
        breakdown,
        price: form.price,
        duration,
        reconciliation,
    }
}

/// Price a booking that is still being edited.
pub async fn quote(state: &AppState, owner: OwnerId, request: QuoteRequest) -> Result<Quote> {
    request.validate()?;

    let packages = state
        .cache
        .package_catalog(state.packages.as_ref(), owner)
        .await?;
    let catalog = state
        .cache
        .add_on_catalog(state.add_ons.as_ref(), owner)
        .await?;

    let (mut form, payments) = request.into_form();
    let quote = evaluate(&mut form, &packages, &catalog, None, payments);
    debug!(
        "Quote for {}: suggested {} current {}",
        owner,
        quote.price.auto_price,
        quote.price.current()
    );
    Ok(quote)
}

/// Stored booking with its pricing figures
#[derive(Debug, Clone)]
pub struct BookingPricing {
    pub booking: Booking,
    pub package_name: Option<String>,
    pub quote: Quote,
    pub payments: Vec<Payment>,
}

/// Payments recorded for one booking, oldest first.
pub async fn payments_for(state: &AppState, owner: OwnerId, booking_id: Uuid) -> Result<Vec<Payment>> {
    let mut payments: Vec<Payment> = state
        .payments
        .list(owner)
        .await?
        .into_iter()
        .filter(|p| p.booking_id == booking_id)
        .collect();
    payments.sort_by(|a, b| (a.paid_on, a.created_at).cmp(&(b.paid_on, b.created_at)));
    Ok(payments)
}

/// Suggested price, stored price and payment status of a booking.
///
/// Payments are reconciled against the stored `total_price`, which is what
/// the client owes even if the catalog changed since the booking was saved.
pub async fn booking_pricing(state: &AppState, owner: OwnerId, booking_id: Uuid) -> Result<BookingPricing> {
    let booking = state
        .bookings
        .get(owner, booking_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let packages = state
        .cache
        .package_catalog(state.packages.as_ref(), owner)
        .await?;
    let catalog = state
        .cache
        .add_on_catalog(state.add_ons.as_ref(), owner)
        .await?;
    let payments = payments_for(state, owner, booking_id).await?;

    let mut form = BookingForm::from_booking(&booking);
    let package_name = form.package(&packages).map(|p| p.name.clone());
    if booking.package_id.is_some() && package_name.is_none() {
        debug!("Booking {} references a deleted package", booking.id);
    }

    let quote = evaluate(
        &mut form,
        &packages,
        &catalog,
        Some(booking.total_price),
        payments.iter().map(|p| p.amount),
    );

    Ok(BookingPricing {
        booking,
        package_name,
        quote,
        payments,
    })
}

/// Turn a booking request into the row to store.
///
/// Without a `user_price` the booking takes the suggested price and stays
/// automatic; with one, the typed price is stored and flagged as edited.
///
/// Package and add-on ids must exist in the catalog, except ids the stored
/// booking (`existing`, on update) already holds: those may have been
/// deleted since and keep pricing as zero.
pub async fn booking_draft(
    state: &AppState,
    owner: OwnerId,
    request: BookingRequest,
    existing: Option<&Booking>,
) -> Result<BookingDraft> {
    request.validate()?;

    let packages = state
        .cache
        .package_catalog(state.packages.as_ref(), owner)
        .await?;
    let catalog = state
        .cache
        .add_on_catalog(state.add_ons.as_ref(), owner)
        .await?;

    let selections = into_selections(request.selections);
    let already_held = |id: &Uuid| existing.is_some_and(|b| b.add_ons.contains_key(id));
    if let Some(unknown) = selections
        .keys()
        .find(|id| !catalog.contains_key(*id) && !already_held(*id))
    {
        warn!("Booking request references unknown add-on {}", unknown);
        return Err(AppError::BadRequest(format!("unknown add-on {}", unknown)));
    }

    if let Some(package_id) = request.package_id {
        let kept = existing.is_some_and(|b| b.package_id == Some(package_id));
        match packages.get(&package_id) {
            Some(package) => check_guest_minimum(request.guest_count, package.base_guests)?,
            None if kept => debug!("Booking keeps deleted package {}", package_id),
            None => {
                return Err(AppError::BadRequest(format!("unknown package {}", package_id)));
            }
        }
    }

    let mut form = BookingForm {
        package_id: request.package_id,
        guest_count: request.guest_count,
        selections,
        start_time: request.start_time,
        end_time: request.end_time,
        price: PriceField {
            auto_price: Decimal::ZERO,
            user_price: request.user_price,
        },
    };
    form.recalculate(&packages, &catalog);

    Ok(BookingDraft {
        client_name: request.client_name,
        event_date: request.event_date,
        package_id: form.package_id,
        guest_count: form.guest_count,
        start_time: form.start_time,
        end_time: form.end_time,
        add_ons: form.selections,
        total_price: form.price.current(),
        price_edited: form.price.is_manual(),
        notes: request.notes.filter(|n| !n.trim().is_empty()),
    })
}

fn check_guest_minimum(guest_count: Option<i32>, base_guests: i32) -> Result<()> {
    if guest_count.is_some_and(|g| g < base_guests) {
        return Err(AppError::BadRequest(format!(
            "guest_count must be at least the package minimum of {}",
            base_guests
        )));
    }
    Ok(())
}
