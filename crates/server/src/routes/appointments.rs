use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use common::pagination::PageQuery;
use common::types::Detail;
use models::appointment::{self, AppointmentStatus};
use service::appointment::{self as booking, AppointmentPatch, NewAppointment};

use crate::errors::ApiError;
use crate::extract::{CurrentMechanic, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignMechanic {
    pub mechanic_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct Assignment {
    pub detail: String,
    pub appointment_id: i32,
    pub mechanic_id: Option<i32>,
    pub status: AppointmentStatus,
}

/// An empty body means "assign the caller"; anything else must be a valid
/// JSON `AssignMechanic`.
fn assignment_target(headers: &HeaderMap, body: &[u8]) -> Result<Option<i32>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
        })
        .unwrap_or(false);
    if !is_json {
        return Err(ApiError::bad_request("Expected request with `Content-Type: application/json`"));
    }
    let Json(assign) = Json::<AssignMechanic>::from_bytes(body).map_err(|e| ApiError::bad_request(e.body_text()))?;
    Ok(assign.mechanic_id)
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/appointments", get(list).post(create))
        .route("/appointments/", get(list).post(create))
        .route("/appointments/:id", put(update).delete(cancel))
        .route("/appointments/:id/assign-mechanic", put(assign_mechanic))
}

#[utoipa::path(post, path = "/appointments/", tag = "appointments", security(("bearer" = [])), request_body = crate::openapi::NewAppointmentDoc,
    responses((status = 200, description = "Booked as pending", body = crate::openapi::AppointmentDoc), (status = 403, description = "Not your car"), (status = 404, description = "Service not found")))]
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(input): Json<NewAppointment>,
) -> Result<Json<appointment::Model>, ApiError> {
    Ok(Json(booking::create_appointment(&state.db, &state.notifier, &caller, input).await?))
}

#[utoipa::path(get, path = "/appointments/", tag = "appointments", security(("bearer" = [])),
    responses((status = 200, description = "Own appointments, or all for admins", body = [crate::openapi::AppointmentDoc])))]
pub async fn list(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<appointment::Model>>, ApiError> {
    Ok(Json(booking::list_appointments(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(put, path = "/appointments/{id}", tag = "appointments", security(("bearer" = [])), params(("id" = i32, Path, description = "Appointment id")),
    request_body = crate::openapi::AppointmentPatchDoc,
    responses((status = 200, description = "Updated", body = crate::openapi::AppointmentDoc), (status = 400, description = "Terminal or invalid transition")))]
pub async fn update(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<i32>,
    Json(patch): Json<AppointmentPatch>,
) -> Result<Json<appointment::Model>, ApiError> {
    Ok(Json(booking::update_appointment(&state.db, &caller, id, patch).await?))
}

#[utoipa::path(delete, path = "/appointments/{id}", tag = "appointments", security(("bearer" = [])), params(("id" = i32, Path, description = "Appointment id")),
    responses((status = 200, description = "Cancelled"), (status = 400, description = "Already completed or cancelled")))]
pub async fn cancel(State(state): State<AppState>, CurrentUser(caller): CurrentUser, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    booking::cancel_appointment(&state.db, &caller, id).await?;
    Ok(Json(Detail::new("Appointment cancelled successfully")))
}

/// Body is optional; an empty body or one without `mechanic_id` assigns the
/// calling admin. A non-empty body that is not valid JSON is rejected.
#[utoipa::path(put, path = "/appointments/{id}/assign-mechanic", tag = "appointments", security(("bearer" = [])),
    params(("id" = i32, Path, description = "Appointment id")),
    responses((status = 200, description = "Assigned and confirmed"), (status = 400, description = "Malformed body or terminal appointment"), (status = 403, description = "Admins only"), (status = 404, description = "Appointment or mechanic not found")))]
pub async fn assign_mechanic(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Assignment>, ApiError> {
    let mechanic_id = assignment_target(&headers, &body)?;
    let updated = booking::assign_mechanic(&state.db, &caller, id, mechanic_id).await?;
    Ok(Json(Assignment {
        detail: "Mechanic assigned successfully".into(),
        appointment_id: updated.id,
        mechanic_id: updated.mechanic_id,
        status: updated.status,
    }))
}
