mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{
    TestApp, completed_event, json_request, read_json, signed_webhook, webhook_with_signature,
};
use domain::payment::{PaymentSessionId, PaymentStatus};
use photo_revive_application::ports::outgoing::payment_session_store::PaymentSessionStorePort;

async fn checkout(app: &TestApp, name: &str, amount: i64, user_id: &str) -> String {
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/create-checkout-session",
            &json!({ "name": name, "amount": amount, "metadata": { "user_id": user_id } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    read_json(response).await["id"].as_str().unwrap().to_string()
}

async fn session_status(app: &TestApp, id: &str) -> PaymentStatus {
    app.sessions
        .find_session(&PaymentSessionId::new(id))
        .await
        .unwrap()
        .unwrap()
        .status
}

#[tokio::test]
async fn pro_checkout_carries_user_id_and_confirmation_grants_500() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_1", 1).await;

    let session_id = checkout(&app, "Pro", 2000, "user_1").await;

    let forms = app.gateway.checkout_forms();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["metadata[user_id]"], "user_1");
    assert_eq!(forms[0]["line_items[0][price_data][unit_amount]"], "2000");
    assert_eq!(forms[0]["mode"], "payment");
    assert_eq!(session_status(&app, &session_id).await, PaymentStatus::Pending);

    let response = app
        .router
        .clone()
        .oneshot(signed_webhook(&completed_event("evt_1", &session_id, "user_1")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["success"], true);
    assert_eq!(app.credits_of("user_1").await, Some(501));
    assert_eq!(session_status(&app, &session_id).await, PaymentStatus::Completed);
}

#[tokio::test]
async fn redelivered_confirmation_credits_once() {
    let app = TestApp::spawn().await;
    let session_id = checkout(&app, "Standard", 1000, "user_2").await;
    let event = completed_event("evt_dup", &session_id, "user_2");

    for _ in 0..3 {
        let response = app
            .router
            .clone()
            .oneshot(signed_webhook(&event))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(app.credits_of("user_2").await, Some(200));
}

#[tokio::test]
async fn tampered_or_missing_signature_never_touches_the_ledger() {
    let app = TestApp::spawn().await;
    app.seed_credits("user_3", 4).await;
    let session_id = checkout(&app, "Pro", 2000, "user_3").await;
    let event = completed_event("evt_forged", &session_id, "user_3");

    let forged = webhook_with_signature(&event, Some("t=1700000000,v1=deadbeef"));
    let response = app.router.clone().oneshot(forged).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["reason"], "invalid_signature");

    let unsigned = webhook_with_signature(&event, None);
    let response = app.router.clone().oneshot(unsigned).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.credits_of("user_3").await, Some(4));
    assert_eq!(session_status(&app, &session_id).await, PaymentStatus::Pending);
}

#[tokio::test]
async fn expired_session_is_marked_abandoned() {
    let app = TestApp::spawn().await;
    let session_id = checkout(&app, "Pro", 2000, "user_4").await;
    let event = json!({
        "id": "evt_exp",
        "type": "checkout.session.expired",
        "data": { "object": { "id": session_id } }
    })
    .to_string();

    let response = app
        .router
        .clone()
        .oneshot(signed_webhook(&event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(session_status(&app, &session_id).await, PaymentStatus::Abandoned);
    assert_eq!(app.credits_of("user_4").await, None);
}

#[tokio::test]
async fn unrelated_events_are_acknowledged() {
    let app = TestApp::spawn().await;
    let event = json!({
        "id": "evt_other",
        "type": "invoice.paid",
        "data": { "object": { "id": "in_1" } }
    })
    .to_string();

    let response = app
        .router
        .clone()
        .oneshot(signed_webhook(&event))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn invalid_checkout_requests_are_rejected_before_the_gateway() {
    let app = TestApp::spawn().await;

    for body in [
        json!({ "name": "Pro", "amount": 0, "metadata": { "user_id": "user_1" } }),
        json!({ "name": "", "amount": 2000, "metadata": { "user_id": "user_1" } }),
        json!({ "name": "Pro", "amount": 2000 }),
        json!({ "amount": 2000 }),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("POST", "/create-checkout-session", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{body}");
    }

    assert!(app.gateway.checkout_forms().is_empty());
}

#[tokio::test]
async fn unreachable_gateway_is_a_server_error() {
    let app = TestApp::spawn_with(
        |config| config.payments.api_base_url = "http://127.0.0.1:9".to_string(),
        None,
    )
    .await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/create-checkout-session",
            &json!({ "name": "Pro", "amount": 2000, "metadata": { "user_id": "user_1" } }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["reason"], "payment_gateway_error");
}
