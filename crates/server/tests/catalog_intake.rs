mod support;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use support::{send, send_raw, test_app, TestApp};

/// Register a user and optionally promote it; returns the token.
async fn user_token(t: &TestApp, username: &str, staff: bool) -> String {
    let (_, body) = send(
        &t.app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({"username": username, "email": format!("{username}@example.com"), "password": "Tr0ub4dor&3x"})),
    )
    .await;
    if staff {
        let id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();
        t.users.set_staff(id, true).await;
    }
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn catalog_writes_require_staff() {
    let t = test_app();
    let member = user_token(&t, "member", false).await;

    let (status, _) = send(&t.app, "POST", "/api/admin/categories", None, Some(json!({"name": "Design"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&t.app, "POST", "/api/admin/categories", Some(&member), Some(json!({"name": "Design"}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_writes_show_up_in_public_reads() {
    let t = test_app();
    let admin = user_token(&t, "editor", true).await;

    // Warm the cache so the writes below have something to invalidate
    let (status, body) = send(&t.app, "GET", "/api/services/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, cat) = send(&t.app, "POST", "/api/admin/categories", Some(&admin), Some(json!({"name": "Web Design"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cat["slug"], "web-design");

    let (_, body) = send(&t.app, "GET", "/api/services/categories", None, None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, svc) = send(
        &t.app,
        "POST",
        "/api/admin/services",
        Some(&admin),
        Some(json!({
            "title": "Landing Pages",
            "category_id": cat["id"],
            "short_description": "One page, done well",
            "is_featured": true,
            "price": "499.00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(svc["slug"], "landing-pages");

    let (status, body) = send(&t.app, "GET", "/api/services/landing-pages", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category_name"], "Web Design");

    let (_, body) = send(&t.app, "GET", "/api/services/featured", None, None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = send(&t.app, "GET", "/api/services/category/web-design", None, None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = send(&t.app, "GET", "/api/services", None, None).await;
    assert_eq!(body["count"], 1);

    let uri = format!("/api/admin/services/{}", svc["id"].as_str().unwrap());
    let (status, _) = send(&t.app, "DELETE", &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&t.app, "GET", "/api/services/landing-pages", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&t.app, "GET", "/api/services/featured", None, None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn unknown_slugs() {
    let t = test_app();
    let (status, _) = send(&t.app, "GET", "/api/services/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&t.app, "GET", "/api/services/categories/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&t.app, "GET", "/api/services/category/nope", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn contact_message_is_stored() {
    let t = test_app();
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/contact/message",
        None,
        Some(json!({"name": "Jo", "email": "jo@example.com", "subject": "Quote", "message": "Need a site"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].as_str().unwrap().starts_with("Your message has been sent"));
    assert_eq!(t.intake.messages().await.len(), 1);

    let (status, body) = send(&t.app, "POST", "/api/contact/message", None, Some(json!({"email": "not-an-email"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("email").is_some());
    assert!(body.get("message").is_some());
    assert_eq!(t.intake.messages().await.len(), 1);
}

#[tokio::test]
async fn newsletter_signup_twice() {
    let t = test_app();
    let (status, _) = send(&t.app, "POST", "/api/contact/newsletter", None, Some(json!({"email": "Fan@Example.com"}))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&t.app, "POST", "/api/contact/newsletter", None, Some(json!({"email": "fan@example.com"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().is_some());
    assert_eq!(t.intake.subscriptions().await.len(), 1);
}

#[tokio::test]
async fn health_and_docs() {
    let t = test_app();
    let (status, body) = send(&t.app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = send(&t.app, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/auth/login").is_some());
}

#[tokio::test]
async fn malformed_bodies_get_the_field_error_shape() {
    let t = test_app();
    for body in ["{not json", r#"{"email": 42}"#] {
        let (status, body) = send_raw(&t.app, "POST", "/api/contact/newsletter", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["non_field_errors"].as_array().is_some_and(|m| !m.is_empty()));
    }
    assert!(t.intake.subscriptions().await.is_empty());
}
