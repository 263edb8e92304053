use axum::{
    extract::{Path, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use common::types::Message;
use service::auth::domain::{AccessLevel, AuthContext, AuthUser, LoginInput, ProfileUpdate, RegisterInput};
use service::auth::errors::AuthError;

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

/// Extract the key from `Authorization: Token <key>` or `Authorization: Bearer <key>`.
pub fn token_from_header(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer") {
        let key = key.trim();
        (!key.is_empty()).then_some(key)
    } else {
        None
    }
}

/// Token gate: resolves the caller and stores its `AuthContext` in the request
/// extensions. Every failure is the same generic 401.
pub async fn require_token(State(state): State<ServerState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let path = req.uri().path().to_string();
    let key = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(token_from_header)
        .map(str::to_string);
    let Some(key) = key else {
        tracing::debug!(path = %path, "missing or malformed Authorization header");
        return Err(ApiError::Unauthorized);
    };
    let ctx = state.auth.authenticate(&key).await.map_err(|e| {
        if !matches!(e, AuthError::Unauthorized) {
            tracing::error!(path = %path, error = %e, "token lookup failed");
        }
        ApiError::from(e)
    })?;
    req.extensions_mut().insert(ctx);
    Ok(next.run(req).await)
}

/// Administrator gate; must run after `require_token`.
pub async fn require_admin(State(state): State<ServerState>, req: Request, next: Next) -> Result<Response, ApiError> {
    let ctx = req.extensions().get::<AuthContext>().ok_or(ApiError::Unauthorized)?;
    state.auth.authorize(ctx, AccessLevel::Administrator)?;
    Ok(next.run(req).await)
}

#[utoipa::path(post, path = "/api/auth/register", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Invalid or duplicate fields")))]
pub async fn register(State(state): State<ServerState>, ApiJson(input): ApiJson<RegisterInput>) -> Result<(StatusCode, Json<Value>), ApiError> {
    let reg = state.auth.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"token": reg.token, "user": reg.user, "message": "User registered successfully"})),
    ))
}

#[utoipa::path(post, path = "/api/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Invalid credentials")))]
pub async fn login(State(state): State<ServerState>, ApiJson(input): ApiJson<LoginInput>) -> Result<Json<Value>, ApiError> {
    let session = state.auth.login(input).await.map_err(|e| match e {
        AuthError::Unauthorized => ApiError::InvalidCredentials,
        other => other.into(),
    })?;
    Ok(Json(json!({
        "token": session.token,
        "user_id": session.user_id,
        "username": session.username,
        "email": session.email,
        "message": "Login successful",
    })))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "auth", responses((status = 200, description = "Logged out"), (status = 401, description = "Unauthorized")))]
pub async fn logout(State(state): State<ServerState>, Extension(ctx): Extension<AuthContext>) -> Result<Json<Message>, ApiError> {
    state.auth.logout(&ctx).await?;
    Ok(Json(Message::new("Successfully logged out")))
}

#[utoipa::path(get, path = "/api/auth/profile", tag = "auth", responses((status = 200, description = "Own profile"), (status = 401, description = "Unauthorized")))]
pub async fn profile(State(state): State<ServerState>, Extension(ctx): Extension<AuthContext>) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(state.auth.profile(&ctx).await?))
}

#[utoipa::path(patch, path = "/api/auth/profile", tag = "auth", request_body = crate::openapi::ProfileUpdateRequest, responses((status = 200, description = "Updated"), (status = 400, description = "Invalid fields")))]
pub async fn update_profile(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    ApiJson(update): ApiJson<ProfileUpdate>,
) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(state.auth.update_profile(&ctx, update).await?))
}

#[utoipa::path(get, path = "/api/auth/users", tag = "auth", responses((status = 200, description = "All users"), (status = 403, description = "Not an administrator")))]
pub async fn list_users(State(state): State<ServerState>, Extension(ctx): Extension<AuthContext>) -> Result<Json<Vec<AuthUser>>, ApiError> {
    Ok(Json(state.auth.list_users(&ctx).await?))
}

#[utoipa::path(delete, path = "/api/auth/users/{id}", tag = "auth", params(("id" = Uuid, Path, description = "User id")), responses((status = 204, description = "Deleted"), (status = 403, description = "Not an administrator"), (status = 404, description = "No such user")))]
pub async fn delete_user(
    State(state): State<ServerState>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.auth.delete_user(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
