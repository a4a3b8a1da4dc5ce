use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use common::pagination::PageQuery;
use common::types::Detail;
use models::car;
use service::car_service::{self, CarPatch, NewCar};

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cars", get(list).post(create))
        .route("/cars/", get(list).post(create))
        .route("/cars/:id", get(read).put(update).delete(remove))
}

#[utoipa::path(post, path = "/cars/", tag = "cars", security(("bearer" = [])), request_body = crate::openapi::NewCarDoc,
    responses((status = 200, description = "Created", body = crate::openapi::CarDoc), (status = 400, description = "Invalid or duplicate VIN / plate"), (status = 403, description = "Car for another user")))]
pub async fn create(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Json(input): Json<NewCar>) -> Result<Json<car::Model>, ApiError> {
    Ok(Json(car_service::create_car(&state.db, &caller, input).await?))
}

#[utoipa::path(get, path = "/cars/", tag = "cars", security(("bearer" = [])),
    responses((status = 200, description = "Own cars, or all for admins", body = [crate::openapi::CarDoc])))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<car::Model>>, ApiError> {
    Ok(Json(car_service::list_cars(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(get, path = "/cars/{id}", tag = "cars", security(("bearer" = [])), params(("id" = i32, Path, description = "Car id")),
    responses((status = 200, description = "Car", body = crate::openapi::CarDoc), (status = 403, description = "Not owner"), (status = 404, description = "Not found")))]
pub async fn read(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Path(id): Path<i32>) -> Result<Json<car::Model>, ApiError> {
    Ok(Json(car_service::get_car(&state.db, &caller, id).await?))
}

#[utoipa::path(put, path = "/cars/{id}", tag = "cars", security(("bearer" = [])), params(("id" = i32, Path, description = "Car id")),
    request_body = crate::openapi::CarPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::CarDoc)))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<CarPatch>,
) -> Result<Json<car::Model>, ApiError> {
    Ok(Json(car_service::update_car(&state.db, &caller, id, patch).await?))
}

#[utoipa::path(delete, path = "/cars/{id}", tag = "cars", security(("bearer" = [])), params(("id" = i32, Path, description = "Car id")),
    responses((status = 200, description = "Deleted")))]
pub async fn remove(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    car_service::delete_car(&state.db, &caller, id).await?;
    Ok(Json(Detail::new("Car deleted successfully")))
}
