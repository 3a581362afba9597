//! Pricing engine module for the salon admin.
//!
//! The calculators are pure functions over a package, the guest count and the
//! chosen add-ons. Everything else here (form state, DTOs, services, routes)
//! feeds them and presents their results.

pub mod calculators;
pub mod form;
pub mod format;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{
    compute_duration_delta, compute_suggested_price, reconcile_payments, round_money,
    AddOnCatalog, DurationDelta, PackageCatalog, PaymentStatus, PriceBreakdown, Reconciliation,
};
pub use form::{BookingForm, PriceField};
pub use format::format_money;
pub use routes::router;
