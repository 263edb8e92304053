mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::{send, test_app};

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": "Tr0ub4dor&3x",
        "first_name": "Ada",
        "last_name": "Lovelace",
    })
}

#[tokio::test]
async fn register_login_logout_flow() {
    let t = test_app();

    let (status, body) = send(&t.app, "POST", "/api/auth/register", None, Some(registration("ada"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "ada");
    assert!(body["user"].get("password").is_none());
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 40);

    // Login hands back the same token
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": "ada", "password": "Tr0ub4dor&3x"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token"], token.as_str());
    assert_eq!(body["email"], "ada@example.com");
    assert_eq!(body["message"], "Login successful");

    let (status, body) = send(&t.app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ada");

    let (status, body) = send(&t.app, "POST", "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully logged out");

    let (status, _) = send(&t.app, "GET", "/api/auth/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_password_is_generic_401() {
    let t = test_app();
    send(&t.app, "POST", "/api/auth/register", None, Some(registration("grace"))).await;

    for creds in [
        json!({"username": "grace", "password": "wrong-pass"}),
        json!({"username": "nobody", "password": "Tr0ub4dor&3x"}),
    ] {
        let (status, body) = send(&t.app, "POST", "/api/auth/login", None, Some(creds)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn register_reports_field_errors() {
    let t = test_app();
    send(&t.app, "POST", "/api/auth/register", None, Some(registration("linus"))).await;

    let (status, body) = send(&t.app, "POST", "/api/auth/register", None, Some(registration("linus"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("username").is_some());

    let (status, body) = send(
        &t.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": "ken", "email": "ken@example.com", "password": "123456789"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("password").is_some());
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let t = test_app();
    let (status, _) = send(&t.app, "GET", "/api/auth/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let bogus = "0".repeat(40);
    let (status, _) = send(&t.app, "GET", "/api/auth/profile", Some(&bogus), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_update_changes_fields() {
    let t = test_app();
    let (_, body) = send(&t.app, "POST", "/api/auth/register", None, Some(registration("barbara"))).await;
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&t.app, "PATCH", "/api/auth/profile", Some(&token), Some(json!({"first_name": "Babs"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["first_name"], "Babs");
    assert_eq!(body["last_name"], "Lovelace");

    let long = "n".repeat(151);
    let (status, body) = send(&t.app, "PATCH", "/api/auth/profile", Some(&token), Some(json!({"last_name": long}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("last_name").is_some());
}

#[tokio::test]
async fn overlong_name_at_registration_is_400() {
    let t = test_app();
    let mut input = registration("margaret");
    input["first_name"] = json!("m".repeat(151));
    let (status, body) = send(&t.app, "POST", "/api/auth/register", None, Some(input)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("first_name").is_some());
}

#[tokio::test]
async fn user_listing_is_staff_only() {
    let t = test_app();
    let (_, body) = send(&t.app, "POST", "/api/auth/register", None, Some(registration("alan"))).await;
    let token = body["token"].as_str().unwrap().to_string();
    let id: uuid::Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, _) = send(&t.app, "GET", "/api/auth/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    t.users.set_staff(id, true).await;
    let (status, body) = send(&t.app, "GET", "/api/auth/users", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
}
