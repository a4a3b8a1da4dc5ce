use axum::extract::{Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;

use common::pagination::PageQuery;
use common::types::Detail;
use models::user;
use service::auth::AccessToken;
use service::user_service::{self, RegisterUser, UserPatch};

use crate::errors::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserLogin {
    pub email: String,
    pub password: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/me", get(me))
        .route("/users", get(list))
        .route("/users/", get(list))
        .route("/users/:id", put(update).delete(remove))
}

#[utoipa::path(post, path = "/users/register", tag = "users", request_body = crate::openapi::RegisterUserDoc,
    responses((status = 200, description = "Registered", body = crate::openapi::UserDoc), (status = 400, description = "Invalid or duplicate")))]
pub async fn register(State(state): State<AppState>, Json(input): Json<RegisterUser>) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::register(&state.db, input).await?))
}

#[utoipa::path(post, path = "/users/login", tag = "users", request_body = crate::openapi::UserLoginDoc,
    responses((status = 200, description = "Bearer token", body = crate::openapi::AccessTokenDoc), (status = 401, description = "Incorrect email or password")))]
pub async fn login(State(state): State<AppState>, Json(input): Json<UserLogin>) -> Result<Json<AccessToken>, ApiError> {
    let (_, token) = state.users.authenticate(&input.email, &input.password).await?;
    Ok(Json(token))
}

#[utoipa::path(get, path = "/users/me", tag = "users", security(("bearer" = [])),
    responses((status = 200, description = "Current user", body = crate::openapi::UserDoc), (status = 401, description = "Unauthenticated")))]
pub async fn me(CurrentUser(user): CurrentUser) -> Json<user::Model> {
    Json(user)
}

#[utoipa::path(get, path = "/users/", tag = "users", security(("bearer" = [])),
    responses((status = 200, description = "All users", body = [crate::openapi::UserDoc]), (status = 403, description = "Admins only")))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<user::Model>>, ApiError> {
    Ok(Json(user_service::list_users(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(put, path = "/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")),
    request_body = crate::openapi::UserPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::UserDoc), (status = 403, description = "Not self or admin")))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<UserPatch>,
) -> Result<Json<user::Model>, ApiError> {
    Ok(Json(user_service::update_user(&state.db, &caller, id, patch).await?))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "users", security(("bearer" = [])), params(("id" = i32, Path, description = "User id")),
    responses((status = 200, description = "Deleted"), (status = 404, description = "Not found")))]
pub async fn remove(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    user_service::delete_user(&state.db, &caller, id).await?;
    Ok(Json(Detail::new("User deleted successfully")))
}
