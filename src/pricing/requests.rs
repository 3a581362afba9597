//! Request DTOs for pricing and booking endpoints.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::{check_amount, AddOnSelection, Selections};

use super::form::{BookingForm, PriceField};

/// One add-on picked on the booking form
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionRequest {
    pub add_on_id: Uuid,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Collapse a selection list into the keyed map; a repeated id keeps the last entry.
pub fn into_selections(requests: Vec<SelectionRequest>) -> Selections {
    requests
        .into_iter()
        .map(|r| {
            (
                r.add_on_id,
                AddOnSelection {
                    quantity: r.quantity,
                    note: r.note.filter(|n| !n.trim().is_empty()),
                },
            )
        })
        .collect()
}

/// Request to price a booking that is still being edited
#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub package_id: Option<Uuid>,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub selections: Vec<SelectionRequest>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    /// Price typed by the user; absent while the suggestion is in use.
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub user_price: Option<Decimal>,
    /// Amounts already received.
    #[serde(default)]
    pub payments: Vec<Decimal>,
}

impl QuoteRequest {
    /// Amounts must fit what a booking or payment could store.
    pub fn validate(&self) -> Result<()> {
        if let Some(price) = self.user_price {
            check_amount("price", price)?;
        }
        for amount in &self.payments {
            check_amount("payment amount", *amount)?;
        }
        Ok(())
    }

    pub fn into_form(self) -> (BookingForm, Vec<Decimal>) {
        let form = BookingForm {
            package_id: self.package_id,
            guest_count: self.guest_count,
            selections: into_selections(self.selections),
            start_time: self.start_time,
            end_time: self.end_time,
            price: PriceField {
                auto_price: Decimal::ZERO,
                user_price: self.user_price,
            },
        };
        (form, self.payments)
    }
}

/// Request to create or update a booking
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub client_name: String,
    pub event_date: NaiveDate,
    #[serde(default)]
    pub package_id: Option<Uuid>,
    #[serde(default)]
    pub guest_count: Option<i32>,
    #[serde(default)]
    pub selections: Vec<SelectionRequest>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub user_price: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl BookingRequest {
    /// Form-level checks; the pricing engine itself accepts anything.
    pub fn validate(&self) -> Result<()> {
        if self.client_name.trim().is_empty() {
            return Err(AppError::BadRequest("client_name cannot be empty".to_string()));
        }
        if self.guest_count.is_some_and(|g| g < 0) {
            return Err(AppError::BadRequest("guest_count cannot be negative".to_string()));
        }
        if self.selections.iter().any(|s| s.quantity.is_some_and(|q| q < 0)) {
            return Err(AppError::BadRequest("add-on quantity cannot be negative".to_string()));
        }
        if let Some(price) = self.user_price {
            check_amount("price", price)?;
        }
        for time in [&self.start_time, &self.end_time].into_iter().flatten() {
            if super::calculators::parse_clock(time).is_none() {
                return Err(AppError::BadRequest(format!("invalid time '{}', expected HH:MM", time)));
            }
        }
        Ok(())
    }
}

/// Request to record a payment
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub paid_on: NaiveDate,
    pub method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::BadRequest("payment amount must be positive".to_string()));
        }
        check_amount("payment amount", self.amount)?;
        if self.method.trim().is_empty() {
            return Err(AppError::BadRequest("payment method cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Date range filter for reports
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_request_accepts_sparse_body() {
        let request: QuoteRequest = serde_json::from_str("{}").unwrap();
        let (form, payments) = request.into_form();
        assert!(form.package_id.is_none());
        assert!(!form.price.is_manual());
        assert!(payments.is_empty());
    }

    #[test]
    fn test_quote_request_parses_amount_strings() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{"guest_count": 45, "user_price": "2500.00", "payments": ["1000", "250.50"]}"#,
        )
        .unwrap();
        assert_eq!(request.user_price, Some(dec!(2500.00)));
        assert_eq!(request.payments, vec![dec!(1000), dec!(250.50)]);
    }

    #[test]
    fn test_quote_request_rejects_out_of_range_amounts() {
        let request: QuoteRequest = serde_json::from_str(
            r#"{"payments": ["79228162514264337593543950335", "1"]}"#,
        )
        .unwrap();
        assert!(matches!(request.validate(), Err(AppError::BadRequest(_))));

        let request: QuoteRequest = serde_json::from_str(r#"{"user_price": "-10"}"#).unwrap();
        assert!(request.validate().is_err());

        let request: QuoteRequest =
            serde_json::from_str(r#"{"user_price": "2500", "payments": ["1000"]}"#).unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_into_selections_keeps_last_duplicate() {
        let id = Uuid::new_v4();
        let selections = into_selections(vec![
            SelectionRequest { add_on_id: id, quantity: Some(1), note: None },
            SelectionRequest { add_on_id: id, quantity: Some(4), note: Some(" ".to_string()) },
        ]);
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[&id].quantity, Some(4));
        assert!(selections[&id].note.is_none());
    }

    #[test]
    fn test_booking_request_validation() {
        let mut request: BookingRequest = serde_json::from_str(
            r#"{"client_name": "Ana", "event_date": "2026-11-20", "start_time": "18:00", "end_time": "23:30"}"#,
        )
        .unwrap();
        assert!(request.validate().is_ok());

        request.end_time = Some("late".to_string());
        assert!(request.validate().is_err());

        request.end_time = Some("23:30:00".to_string());
        assert!(request.validate().is_err());

        request.end_time = None;
        request.guest_count = Some(-3);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_payment_must_be_positive() {
        let request: PaymentRequest = serde_json::from_str(
            r#"{"amount": "0", "paid_on": "2026-10-01", "method": "pix"}"#,
        )
        .unwrap();
        assert!(matches!(request.validate(), Err(AppError::BadRequest(_))));

        let request: PaymentRequest = serde_json::from_str(
            r#"{"amount": "10000000000", "paid_on": "2026-10-01", "method": "pix"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
    }
}
