//! Router tests against in-memory repositories.

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use super::router;
use crate::auth::memory::MemorySessions;
use crate::test_support::{login, memory_state_with, send, send_raw, state_with_user};

struct Catalog {
    package: String,
    chairs: String,
    band: String,
}

async fn seed_catalog(app: &axum::Router, token: &str) -> Catalog {
    let (status, package) = send(
        app,
        Method::POST,
        "/api/packages",
        Some(token),
        Some(json!({
            "name": "Festa Ouro",
            "duration_hours": "5",
            "base_guests": 40,
            "base_price": "2000",
            "price_per_guest": "25"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let mut ids = Vec::new();
    for (name, model, price) in [
        ("Cadeiras extras", "per-unit", "15"),
        ("Banda", "per-event", "400"),
    ] {
        let (status, add_on) = send(
            app,
            Method::POST,
            "/api/add-ons",
            Some(token),
            Some(json!({"name": name, "pricing_model": model, "price": price})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(add_on["id"].as_str().unwrap().to_string());
    }

    Catalog {
        package: package["id"].as_str().unwrap().to_string(),
        chairs: ids[0].clone(),
        band: ids[1].clone(),
    }
}

fn booking_body(catalog: &Catalog) -> Value {
    json!({
        "client_name": "Ana Souza",
        "event_date": "2026-12-05",
        "package_id": catalog.package,
        "guest_count": 45,
        "selections": [
            {"add_on_id": catalog.chairs, "quantity": 10},
            {"add_on_id": catalog.band}
        ],
        "start_time": "18:00",
        "end_time": "23:30"
    })
}

async fn add_payment(app: &axum::Router, token: &str, booking_id: &str, amount: &str, day: &str) -> Value {
    let (status, payment) = send(
        app,
        Method::POST,
        &format!("/api/bookings/{}/payments", booking_id),
        Some(token),
        Some(json!({"amount": amount, "paid_on": day, "method": "pix"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    payment
}

#[tokio::test]
async fn test_health_is_public() {
    let (state, _) = state_with_user().await;
    let app = router(state);

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["cache"]["package_catalogs"], 0);
}

#[tokio::test]
async fn test_api_requires_session() {
    let (state, _) = state_with_user().await;
    let app = router(state);

    let (status, body) = send(&app, Method::GET, "/api/packages", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_type"], "unauthorized");

    let (status, _) = send(&app, Method::GET, "/api/packages", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_logout() {
    let (state, owner) = state_with_user().await;
    let app = router(state);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "dona@salao.test", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = login(&app).await;
    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["owner_id"], owner.to_string());

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_end_to_end_booking_flow() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    // Live quote while the form is being filled in
    let (status, quote) = send(
        &app,
        Method::POST,
        "/api/pricing/quote",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["suggested_price"]["display"], "R$ 2.675,00");
    assert_eq!(quote["current_price"]["display"], "R$ 2.675,00");
    assert_eq!(quote["price_edited"], false);
    assert_eq!(quote["breakdown"]["excess_guests"], 5);
    assert_eq!(quote["breakdown"]["add_ons"].as_array().unwrap().len(), 2);
    assert_eq!(quote["duration"]["extra_hours"], 1);

    let (status, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["price_edited"], false);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    add_payment(&app, &token, &booking_id, "1000", "2026-10-01").await;
    add_payment(&app, &token, &booking_id, "1000", "2026-11-01").await;

    let (status, pricing) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}/pricing", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pricing["client_name"], "Ana Souza");
    assert_eq!(pricing["reconciliation"]["balance"]["display"], "R$ 675,00");
    assert_eq!(pricing["reconciliation"]["status"], "partial");
    assert_eq!(pricing["reconciliation"]["is_fully_paid"], false);
    assert_eq!(pricing["payments"].as_array().unwrap().len(), 2);
    assert!(pricing["duration"]["warning"]
        .as_str()
        .unwrap()
        .contains("1 hour"));

    let (status, report) = send(
        &app,
        Method::GET,
        "/api/reports/revenue?from=2026-12-01&to=2026-12-31",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["overall"]["bookings"], 1);
    assert_eq!(report["statuses"]["partial"], 1);
    assert_eq!(report["months"][0]["month"], "2026-12");

    let (status, html) = send_raw(
        &app,
        Method::GET,
        &format!("/bookings/{}/statement", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("Ana Souza"));
    assert!(html.contains("R$ 2.675,00"));
    assert!(html.contains("R$ 675,00"));
    assert!(html.contains("Partially paid"));
}

#[tokio::test]
async fn test_user_price_is_kept_across_catalog_changes() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let mut body = booking_body(&catalog);
    body["user_price"] = json!("2500");
    let (status, booking) = send(&app, Method::POST, "/api/bookings", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["price_edited"], true);
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Deleting the band changes the suggestion only
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/add-ons/{}", catalog.band),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, pricing) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}/pricing", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(pricing["suggested_price"]["display"], "R$ 2.275,00");
    assert_eq!(pricing["current_price"]["display"], "R$ 2.500,00");
    assert_eq!(pricing["price_edited"], true);
}

#[tokio::test]
async fn test_quote_ignores_unknown_add_on() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let (status, quote) = send(
        &app,
        Method::POST,
        "/api/pricing/quote",
        Some(&token),
        Some(json!({
            "package_id": catalog.package,
            "guest_count": 40,
            "selections": [{"add_on_id": uuid::Uuid::new_v4(), "quantity": 3}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["suggested_price"]["display"], "R$ 2.000,00");
    assert!(quote["breakdown"]["add_ons"].as_array().unwrap().is_empty());
    assert_eq!(quote["reconciliation"]["status"], "unpaid");
}

#[tokio::test]
async fn test_booking_rejects_unknown_add_on() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let mut body = booking_body(&catalog);
    body["selections"] = json!([{"add_on_id": uuid::Uuid::new_v4()}]);
    let (status, error) = send(&app, Method::POST, "/api/bookings", Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error_type"], "bad_request");
}

#[tokio::test]
async fn test_payment_validation_and_delete() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let (_, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();
    let payments_uri = format!("/api/bookings/{}/payments", booking_id);

    let (status, _) = send(
        &app,
        Method::POST,
        &payments_uri,
        Some(&token),
        Some(json!({"amount": "-50", "paid_on": "2026-10-01", "method": "pix"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/api/bookings/{}/payments", uuid::Uuid::new_v4()),
        Some(&token),
        Some(json!({"amount": "50", "paid_on": "2026-10-01", "method": "pix"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let payment = add_payment(&app, &token, &booking_id, "2675", "2026-10-01").await;
    let payment_id = payment["id"].as_str().unwrap();

    let (_, pricing) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}/pricing", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(pricing["reconciliation"]["status"], "paid");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("{}/{}", payments_uri, payment_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, payments) = send(&app, Method::GET, &payments_uri, Some(&token), None).await;
    assert!(payments.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_owners_do_not_see_each_other() {
    let sessions = Arc::new(MemorySessions::default());
    sessions.add_user("dona@salao.test", "festa123").await;
    sessions.add_user("outra@salao.test", "outra123").await;
    let app = router(memory_state_with(sessions));

    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;
    let (_, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (_, other) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": "outra@salao.test", "password": "outra123"})),
    )
    .await;
    let other_token = other["token"].as_str().unwrap();

    let (status, packages) = send(&app, Method::GET, "/api/packages", Some(other_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(packages.as_array().unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}", booking_id),
        Some(other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/packages/{}", catalog.package),
        Some(other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_quote_rejects_overflowing_payments() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;

    let (status, error) = send(
        &app,
        Method::POST,
        "/api/pricing/quote",
        Some(&token),
        Some(json!({"payments": ["79228162514264337593543950335", "1"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error_type"], "bad_request");
}

#[tokio::test]
async fn test_booking_with_deleted_package_stays_editable() {
    let (state, _) = state_with_user().await;
    let app = router(state);
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let (_, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    let booking_uri = format!("/api/bookings/{}", booking["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/packages/{}", catalog.package),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let mut body = booking_body(&catalog);
    body["notes"] = json!("Bolo de chocolate");
    let (status, updated) = send(&app, Method::PUT, &booking_uri, Some(&token), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["package_id"], catalog.package.as_str());
    assert_eq!(updated["notes"], "Bolo de chocolate");
    assert_eq!(updated["add_ons"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_deleting_booking_removes_its_payments() {
    let (state, owner) = state_with_user().await;
    let app = router(state.clone());
    let token = login(&app).await;
    let catalog = seed_catalog(&app, &token).await;

    let (_, booking) = send(
        &app,
        Method::POST,
        "/api/bookings",
        Some(&token),
        Some(booking_body(&catalog)),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();
    add_payment(&app, &token, &booking_id, "500", "2026-10-01").await;

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/bookings/{}", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.payments.list(owner).await.unwrap().is_empty());

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/api/bookings/{}/payments", booking_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
