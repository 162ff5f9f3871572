//! # Tests for Handlers
//!
//! Endpoint-level tests driving the full router against an in-memory
//! database and a temporary artifact directory.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::server::{create_app, create_test_app_state};

async fn setup_test_app() -> (Router, TempDir) {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);
    let db = Database::connect(opt).await.expect("Failed to init test DB");
    Migrator::up(&db, None).await.expect("Failed to migrate");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let state = create_test_app_state(AppConfig::default(), db, dir.path());
    (create_app(state), dir)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(json_body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn vendor_signup_body(username: &str, national_id: &str, with_document: bool) -> Value {
    let mut body = json!({
        "action": "signup",
        "username": username,
        "email": format!("{}@example.com", username),
        "phone": "5550001",
        "national_id": national_id,
        "password": "s3cret-pass",
    });
    if with_document {
        body["doc_titles"] = json!(["ID Proof"]);
        body["documents"] = json!([{
            "filename": "id.pdf",
            "content": BASE64.encode(b"document-bytes"),
        }]);
    }
    body
}

fn investor_signup_body(username: &str, national_id: &str) -> Value {
    json!({
        "action": "signup",
        "username": username,
        "email": format!("{}@example.com", username),
        "phone": "5550002",
        "national_id": national_id,
        "password": "s3cret-pass",
    })
}

#[tokio::test]
async fn test_root_returns_service_info() {
    let (app, _dir) = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "fundbridge");
}

#[tokio::test]
async fn test_auth_endpoints_describe_themselves() {
    let (app, _dir) = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/vendor/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "vendor");
    assert!(
        body["signup_fields"]
            .as_array()
            .unwrap()
            .contains(&serde_json::json!("documents"))
    );

    let (status, body) = send(&app, "GET", "/investor/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "investor");
}

#[tokio::test]
async fn test_vendor_signup_creates_profile_and_documents() {
    let (app, _dir) = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", true)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["account"]["username"], "alice");
    assert_eq!(body["account"]["role"], "vendor");

    // Dashboard exposes the provisioned profile
    let token = body["token"].as_str().unwrap().to_string();
    let (status, dashboard) = send(&app, "GET", "/dashboard/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["profile"]["document_uploaded"], true);
    assert_eq!(dashboard["profile"]["verified"], false);
    assert!(
        dashboard["profile"]["qr_image"]
            .as_str()
            .unwrap()
            .starts_with("qr_codes/")
    );
}

#[tokio::test]
async fn test_vendor_signup_without_documents_leaves_flag_unset() {
    let (app, _dir) = setup_test_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap().to_string();
    let (_, dashboard) = send(&app, "GET", "/dashboard/", Some(&token), None).await;
    assert_eq!(dashboard["profile"]["document_uploaded"], false);
}

#[tokio::test]
async fn test_duplicate_identity_is_rejected_per_role() {
    let (app, _dir) = setup_test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice2", "NID-1", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_IDENTITY");

    // Same identity string under the other role is a different account
    let (status, _) = send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(investor_signup_body("alice3", "NID-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_signup_rejects_invalid_base64_document() {
    let (app, _dir) = setup_test_app().await;

    let mut body = vendor_signup_body("alice", "NID-1", false);
    body["doc_titles"] = json!(["ID Proof"]);
    body["documents"] = json!([{ "filename": "id.pdf", "content": "not base64!!" }]);

    let (status, response) = send(&app, "POST", "/vendor/", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn test_signup_rejects_path_hostile_username_without_burning_identity() {
    let (app, _dir) = setup_test_app().await;

    let (status, response) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("a/b", "NID-1", false)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_FAILED");

    // No user row was committed, so the same national_id signs up cleanly.
    let (status, body) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", false)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = body["token"].as_str().unwrap().to_string();
    let (status, dashboard) = send(&app, "GET", "/dashboard/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(dashboard["profile"].is_object());
}

#[tokio::test]
async fn test_signup_rejects_path_hostile_document_filename() {
    let (app, _dir) = setup_test_app().await;

    let mut body = vendor_signup_body("alice", "NID-1", false);
    body["doc_titles"] = json!(["ID Proof"]);
    body["documents"] = json!([{
        "filename": "../escape.pdf",
        "content": BASE64.encode(b"document-bytes"),
    }]);

    let (status, response) = send(&app, "POST", "/vendor/", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["code"], "VALIDATION_FAILED");
    assert_eq!(response["details"]["documents"]["filename"], "../escape.pdf");
}

#[tokio::test]
async fn test_login_branches() {
    let (app, _dir) = setup_test_app().await;

    send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(investor_signup_body("ivy", "NID-9")),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(json!({ "action": "login", "national_id": "NID-9", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["username"], "ivy");

    let (status, body) = send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(json!({ "action": "login", "national_id": "NID-9", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_FAILED");

    // Investor credentials do not open a vendor session
    let (status, _) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(json!({ "action": "login", "national_id": "NID-9", "password": "s3cret-pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let (app, _dir) = setup_test_app().await;

    let (status, body) = send(&app, "GET", "/dashboard/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "AUTHENTICATION_FAILED");
}

#[tokio::test]
async fn test_verify_vendor_by_short_id() {
    let (app, _dir) = setup_test_app().await;

    let (_, signup) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", true)),
    )
    .await;
    let token = signup["token"].as_str().unwrap().to_string();
    let (_, dashboard) = send(&app, "GET", "/dashboard/", Some(&token), None).await;
    let short_id = dashboard["profile"]["short_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/vendor/verify/{}/", short_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vendor"], "alice");
    assert_eq!(body["documents"][0]["title"], "ID Proof");

    let (status, body) = send(
        &app,
        "GET",
        "/vendor/verify/ffffffffffffffff/",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_invest_flow() {
    let (app, _dir) = setup_test_app().await;

    let (_, vendor) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", false)),
    )
    .await;
    let vendor_token = vendor["token"].as_str().unwrap().to_string();
    let (_, dashboard) = send(&app, "GET", "/dashboard/", Some(&vendor_token), None).await;
    let short_id = dashboard["profile"]["short_id"].as_str().unwrap().to_string();

    let (_, investor) = send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(investor_signup_body("ivy", "NID-9")),
    )
    .await;
    let investor_token = investor["token"].as_str().unwrap().to_string();

    let invest_uri = format!("/vendor/invest/{}/", short_id);

    // Public invest page shows the standing terms
    let (status, page) = send(&app, "GET", &invest_uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["vendor"], "alice");
    assert_eq!(page["minimum_investment"], "5000");

    // Recording requires a session
    let (status, _) = send(
        &app,
        "POST",
        &invest_uri,
        None,
        Some(json!({ "amount": "10000" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Below-minimum amounts are rejected before anything is persisted
    let (status, body) = send(
        &app,
        "POST",
        &invest_uri,
        Some(&investor_token),
        Some(json!({ "amount": "4999" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Minimum investment is 5000");

    // Exactly the minimum is accepted
    let (status, body) = send(
        &app,
        "POST",
        &invest_uri,
        Some(&investor_token),
        Some(json!({ "amount": "5000" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["investor"], "ivy");
    assert_eq!(body["vendor"], "alice");
    assert!(
        body["agreement_pdf"]
            .as_str()
            .unwrap()
            .starts_with("investment_agreements/")
    );

    // Both sides see the investment
    let (status, listing) = send(&app, "GET", "/my-investments/", Some(&investor_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["investments"].as_array().unwrap().len(), 1);

    let (_, dashboard) = send(&app, "GET", "/dashboard/", Some(&vendor_token), None).await;
    assert_eq!(dashboard["investments_received"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_my_investments_requires_investor_role() {
    let (app, _dir) = setup_test_app().await;

    let (_, vendor) = send(
        &app,
        "POST",
        "/vendor/",
        None,
        Some(vendor_signup_body("alice", "NID-1", false)),
    )
    .await;
    let token = vendor["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/my-investments/", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_logout_ends_session_and_is_unconditional() {
    let (app, _dir) = setup_test_app().await;

    let (_, signup) = send(
        &app,
        "POST",
        "/investor/",
        None,
        Some(investor_signup_body("ivy", "NID-9")),
    )
    .await;
    let token = signup["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "POST", "/logout/", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["logged_out"], true);

    let (status, _) = send(&app, "GET", "/dashboard/", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logout without a session still succeeds
    let (status, _) = send(&app, "POST", "/logout/", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
