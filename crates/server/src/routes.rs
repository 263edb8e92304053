use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod intake;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router, including public, token-protected and admin routes
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/services", get(catalog::list_services))
        .route("/api/services/featured", get(catalog::featured))
        .route("/api/services/category/:slug", get(catalog::by_category))
        .route("/api/services/categories", get(catalog::categories))
        .route("/api/services/categories/:slug", get(catalog::category_detail))
        .route("/api/services/:slug", get(catalog::service_detail))
        .route("/api/contact/message", post(intake::submit_message))
        .route("/api/contact/newsletter", post(intake::subscribe));

    // Token-protected routes; user administration checks privilege in the service
    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/auth/profile",
            get(auth::profile).put(auth::update_profile).patch(auth::update_profile),
        )
        .route("/api/auth/users", get(auth::list_users))
        .route("/api/auth/users/:id", delete(auth::delete_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    // Admin write path; the last layer added runs first
    let admin_routes = Router::new()
        .route("/api/admin/categories", post(admin::create_category))
        .route("/api/admin/categories/:id", put(admin::update_category).delete(admin::delete_category))
        .route("/api/admin/services", post(admin::create_service))
        .route("/api/admin/services/:id", put(admin::update_service).delete(admin::delete_service))
        .route("/api/admin/contact/messages/:id", patch(admin::update_message_status))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_token));

    // Compose
    public
        .merge(protected)
        .merge(admin_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
