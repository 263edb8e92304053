#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use service::auth::{repository::mock::MockAuthRepository, AuthConfig, AuthService};
use service::cache::MokaCache;
use service::catalog::{repository::mock::MockCatalogRepository, CatalogService};
use service::intake::{notifier::LogNotifier, repository::mock::MockIntakeRepository, IntakeService, NotifyAddresses};

use server::{build_app, ServerState};

pub struct TestApp {
    pub app: Router,
    pub users: Arc<MockAuthRepository>,
    pub intake: Arc<MockIntakeRepository>,
}

/// Router over in-memory repositories; no database needed.
pub fn test_app() -> TestApp {
    let users = Arc::new(MockAuthRepository::default());
    let intake = Arc::new(MockIntakeRepository::default());
    let state = ServerState {
        auth: Arc::new(AuthService::new(users.clone(), AuthConfig::default())),
        catalog: Arc::new(CatalogService::new(Arc::new(MockCatalogRepository::default()), Arc::new(MokaCache::new(1_000)))),
        intake: Arc::new(IntakeService::new(
            intake.clone(),
            Arc::new(LogNotifier),
            NotifyAddresses { admin_email: "admin@example.com".into(), from_email: "noreply@example.com".into() },
        )),
    };
    TestApp { app: build_app(state), users, intake }
}

pub async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Token {t}"));
    }
    let req = match body {
        Some(b) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

/// Send a body verbatim, for payloads that are not valid JSON.
pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
