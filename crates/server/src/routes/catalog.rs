use axum::{
    extract::{Path, Query, State},
    Json,
};

use service::catalog::domain::{CategoryView, ServicePage, ServiceView};
use service::pagination::Pagination;

use crate::errors::ApiError;
use crate::state::ServerState;

#[utoipa::path(get, path = "/api/services", tag = "catalog", params(("page" = Option<u32>, Query, description = "1-based page"), ("per_page" = Option<u32>, Query, description = "Page size, at most 100")), responses((status = 200, description = "One page of services")))]
pub async fn list_services(State(state): State<ServerState>, Query(page): Query<Pagination>) -> Result<Json<ServicePage>, ApiError> {
    Ok(Json(state.catalog.list_services(page).await?))
}

#[utoipa::path(get, path = "/api/services/featured", tag = "catalog", responses((status = 200, description = "Featured services")))]
pub async fn featured(State(state): State<ServerState>) -> Result<Json<Vec<ServiceView>>, ApiError> {
    Ok(Json(state.catalog.list_featured().await?))
}

#[utoipa::path(get, path = "/api/services/category/{slug}", tag = "catalog", params(("slug" = String, Path, description = "Category slug")), responses((status = 200, description = "Services in the category")))]
pub async fn by_category(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<Vec<ServiceView>>, ApiError> {
    Ok(Json(state.catalog.list_by_category(&slug).await?))
}

#[utoipa::path(get, path = "/api/services/{slug}", tag = "catalog", params(("slug" = String, Path, description = "Service slug")), responses((status = 200, description = "Service detail"), (status = 404, description = "No such service")))]
pub async fn service_detail(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<ServiceView>, ApiError> {
    Ok(Json(state.catalog.get_service(&slug).await?))
}

#[utoipa::path(get, path = "/api/services/categories", tag = "catalog", responses((status = 200, description = "All categories by name")))]
pub async fn categories(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ApiError> {
    Ok(Json(state.catalog.list_categories().await?))
}

#[utoipa::path(get, path = "/api/services/categories/{slug}", tag = "catalog", params(("slug" = String, Path, description = "Category slug")), responses((status = 200, description = "Category"), (status = 404, description = "No such category")))]
pub async fn category_detail(State(state): State<ServerState>, Path(slug): Path<String>) -> Result<Json<CategoryView>, ApiError> {
    Ok(Json(state.catalog.get_category(&slug).await?))
}
