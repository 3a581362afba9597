//! Domain records shared by the pricing engine and the persistence layer.

pub mod booking;
pub mod catalog;

pub use booking::{AddOnSelection, Booking, BookingDraft, Payment, PaymentDraft, Selections};
pub use catalog::{
    check_amount, AddOn, AddOnDraft, Package, PackageDraft, PricingModel, UnknownPricingModel,
    MAX_AMOUNT,
};

use uuid::Uuid;

/// Opaque identifier of the authenticated account that owns a row.
pub type OwnerId = Uuid;
