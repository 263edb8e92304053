use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use models::contact_message::MessageStatus;
use service::catalog::domain::{CategoryInput, CategoryView, ServiceInput, ServiceView};
use service::intake::domain::ContactMessageView;

use crate::errors::ApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

#[utoipa::path(post, path = "/api/admin/categories", tag = "admin", request_body = crate::openapi::CategoryRequest, responses((status = 201, description = "Created"), (status = 400, description = "Invalid fields"), (status = 403, description = "Not an administrator")))]
pub async fn create_category(State(state): State<ServerState>, ApiJson(input): ApiJson<CategoryInput>) -> Result<(StatusCode, Json<CategoryView>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.catalog.save_category(None, input).await?)))
}

#[utoipa::path(put, path = "/api/admin/categories/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Category id")), request_body = crate::openapi::CategoryRequest, responses((status = 200, description = "Updated"), (status = 404, description = "No such category")))]
pub async fn update_category(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> Result<Json<CategoryView>, ApiError> {
    Ok(Json(state.catalog.save_category(Some(id), input).await?))
}

#[utoipa::path(delete, path = "/api/admin/categories/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Category id")), responses((status = 204, description = "Deleted with its services"), (status = 404, description = "No such category")))]
pub async fn delete_category(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/api/admin/services", tag = "admin", request_body = crate::openapi::ServiceRequest, responses((status = 201, description = "Created"), (status = 400, description = "Invalid fields")))]
pub async fn create_service(State(state): State<ServerState>, ApiJson(input): ApiJson<ServiceInput>) -> Result<(StatusCode, Json<ServiceView>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.catalog.save_service(None, input).await?)))
}

#[utoipa::path(put, path = "/api/admin/services/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Service id")), request_body = crate::openapi::ServiceRequest, responses((status = 200, description = "Updated"), (status = 404, description = "No such service")))]
pub async fn update_service(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    ApiJson(input): ApiJson<ServiceInput>,
) -> Result<Json<ServiceView>, ApiError> {
    Ok(Json(state.catalog.save_service(Some(id), input).await?))
}

#[utoipa::path(delete, path = "/api/admin/services/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Service id")), responses((status = 204, description = "Deleted"), (status = 404, description = "No such service")))]
pub async fn delete_service(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state.catalog.delete_service(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: MessageStatus,
}

#[utoipa::path(patch, path = "/api/admin/contact/messages/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Message id")), request_body = crate::openapi::StatusChangeRequest, responses((status = 200, description = "Updated"), (status = 404, description = "No such message")))]
pub async fn update_message_status(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    ApiJson(change): ApiJson<StatusChange>,
) -> Result<Json<ContactMessageView>, ApiError> {
    Ok(Json(state.intake.update_message_status(id, change.status).await?))
}
