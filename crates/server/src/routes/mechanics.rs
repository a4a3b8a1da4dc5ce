use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use common::pagination::PageQuery;
use common::types::Detail;
use models::mechanic::{self, MechanicRole};
use models::appointment;
use service::appointment as appointments;
use service::mechanic_service::{self, MechanicPatch, RegisterMechanic};

use crate::errors::ApiError;
use crate::extract::CurrentMechanic;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MechanicLogin {
    pub login: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct MechanicToken {
    pub access_token: String,
    pub token_type: String,
    pub mechanic_id: i32,
    pub role: MechanicRole,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/mechanics/register", post(register))
        .route("/mechanics/login", post(login))
        .route("/mechanics/me", get(me))
        .route("/mechanics/appointments", get(assigned_appointments))
        .route("/mechanics", get(list))
        .route("/mechanics/", get(list))
        .route("/mechanics/:id", put(update).delete(remove))
}

#[utoipa::path(post, path = "/mechanics/register", tag = "mechanics", request_body = crate::openapi::RegisterMechanicDoc,
    responses((status = 200, description = "Registered", body = crate::openapi::MechanicDoc), (status = 400, description = "Invalid, underage or duplicate login")))]
pub async fn register(State(state): State<AppState>, Json(input): Json<RegisterMechanic>) -> Result<Json<mechanic::Model>, ApiError> {
    Ok(Json(mechanic_service::register(&state.db, input).await?))
}

#[utoipa::path(post, path = "/mechanics/login", tag = "mechanics", request_body = crate::openapi::MechanicLoginDoc,
    responses((status = 200, description = "Bearer token with mechanic id and role"), (status = 401, description = "Incorrect login or password")))]
pub async fn login(State(state): State<AppState>, Json(input): Json<MechanicLogin>) -> Result<Json<MechanicToken>, ApiError> {
    let (mechanic, token) = state.mechanics.authenticate(&input.login, &input.password).await?;
    Ok(Json(MechanicToken {
        access_token: token.access_token,
        token_type: token.token_type,
        mechanic_id: mechanic.id,
        role: mechanic.role,
    }))
}

#[utoipa::path(get, path = "/mechanics/me", tag = "mechanics", security(("bearer" = [])),
    responses((status = 200, description = "Current mechanic", body = crate::openapi::MechanicDoc)))]
pub async fn me(CurrentMechanic(mechanic): CurrentMechanic) -> Json<mechanic::Model> {
    Json(mechanic)
}

#[utoipa::path(get, path = "/mechanics/", tag = "mechanics", security(("bearer" = [])),
    responses((status = 200, description = "All mechanics", body = [crate::openapi::MechanicDoc]), (status = 403, description = "Admins only")))]
pub async fn list(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<mechanic::Model>>, ApiError> {
    Ok(Json(mechanic_service::list_mechanics(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(get, path = "/mechanics/appointments", tag = "mechanics", security(("bearer" = [])),
    responses((status = 200, description = "Appointments assigned to the caller", body = [crate::openapi::AppointmentDoc])))]
pub async fn assigned_appointments(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<appointment::Model>>, ApiError> {
    Ok(Json(appointments::list_for_mechanic(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(put, path = "/mechanics/{id}", tag = "mechanics", security(("bearer" = [])), params(("id" = i32, Path, description = "Mechanic id")),
    request_body = crate::openapi::MechanicPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::MechanicDoc), (status = 403, description = "Not self or admin")))]
pub async fn update(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Path(id): Path<i32>,
    Json(patch): Json<MechanicPatch>,
) -> Result<Json<mechanic::Model>, ApiError> {
    Ok(Json(mechanic_service::update_mechanic(&state.db, &caller, id, patch).await?))
}

#[utoipa::path(delete, path = "/mechanics/{id}", tag = "mechanics", security(("bearer" = [])), params(("id" = i32, Path, description = "Mechanic id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn remove(State(state): State<AppState>, CurrentMechanic(caller): CurrentMechanic, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    mechanic_service::delete_mechanic(&state.db, state.storage.as_ref(), &caller, id).await?;
    Ok(Json(Detail::new("Mechanic deleted successfully")))
}
