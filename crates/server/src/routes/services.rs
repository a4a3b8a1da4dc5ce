use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use common::pagination::PageQuery;
use common::types::Detail;
use models::service as catalog;
use service::catalog_service::{self, NewService, ServicePatch, ServiceSearch};

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// The static `/services/search` segment takes priority over `/services/:id`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/services/search", get(search))
        .route("/services", get(list).post(create))
        .route("/services/", get(list).post(create))
        .route("/services/:id", get(read).put(update).delete(remove))
}

#[utoipa::path(post, path = "/services/", tag = "services", security(("bearer" = [])), request_body = crate::openapi::NewServiceDoc,
    responses((status = 200, description = "Created", body = crate::openapi::ServiceDoc), (status = 403, description = "Admins only")))]
pub async fn create(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Json(input): Json<NewService>) -> Result<Json<catalog::Model>, ApiError> {
    Ok(Json(catalog_service::create_service(&state.db, &caller, input).await?))
}

#[utoipa::path(get, path = "/services/", tag = "services",
    responses((status = 200, description = "Catalog", body = [crate::openapi::ServiceDoc])))]
pub async fn list(State(state): State<AppState>, Query(page): Query<PageQuery>) -> Result<Json<Vec<catalog::Model>>, ApiError> {
    Ok(Json(catalog_service::list_services(&state.db, page.into_pagination()).await?))
}

#[utoipa::path(get, path = "/services/search", tag = "services",
    params(
        ("name" = Option<String>, Query, description = "Case-insensitive name fragment"),
        ("min_price" = Option<String>, Query, description = "Inclusive lower bound"),
        ("max_price" = Option<String>, Query, description = "Inclusive upper bound"),
    ),
    responses((status = 200, description = "Matches", body = [crate::openapi::ServiceDoc]), (status = 400, description = "min_price > max_price")))]
pub async fn search(State(state): State<AppState>, Query(params): Query<ServiceSearch>) -> Result<Json<Vec<catalog::Model>>, ApiError> {
    Ok(Json(catalog_service::search_services(&state.db, params).await?))
}

#[utoipa::path(get, path = "/services/{id}", tag = "services", params(("id" = i32, Path, description = "Service id")),
    responses((status = 200, description = "Service", body = crate::openapi::ServiceDoc), (status = 404, description = "Not found")))]
pub async fn read(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<catalog::Model>, ApiError> {
    Ok(Json(catalog_service::get_service(&state.db, id).await?))
}

#[utoipa::path(put, path = "/services/{id}", tag = "services", security(("bearer" = [])), params(("id" = i32, Path, description = "Service id")),
    request_body = crate::openapi::ServicePatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::ServiceDoc)))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<ServicePatch>,
) -> Result<Json<catalog::Model>, ApiError> {
    Ok(Json(catalog_service::update_service(&state.db, &caller, id, patch).await?))
}

#[utoipa::path(delete, path = "/services/{id}", tag = "services", security(("bearer" = [])), params(("id" = i32, Path, description = "Service id")),
    responses((status = 200, description = "Deleted"), (status = 400, description = "Still booked")))]
pub async fn remove(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    catalog_service::delete_service(&state.db, &caller, id).await?;
    Ok(Json(Detail::new("Service deleted successfully")))
}
