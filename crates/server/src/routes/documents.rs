use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};

use common::pagination::PageQuery;
use common::types::Detail;
use models::document::{self, DocumentType};
use service::document_service::{self, UploadedFile};
use service::errors::ServiceError;

use crate::errors::ApiError;
use crate::extract::CurrentMechanic;
use crate::state::AppState;

pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/documents/upload", post(upload))
        .route("/documents/all", get(list_all))
        .route("/documents", get(list_own))
        .route("/documents/", get(list_own))
        .route("/documents/:id", put(update).delete(remove))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

#[derive(Default)]
struct DocumentForm {
    document_type: Option<DocumentType>,
    file: Option<UploadedFile>,
}

async fn read_form(mut multipart: Multipart) -> Result<DocumentForm, ApiError> {
    let mut form = DocumentForm::default();
    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::bad_request(e.body_text()))? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::bad_request("Uploaded file has no name"))?;
                let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                form.file = Some(UploadedFile { file_name, bytes: bytes.to_vec() });
            }
            Some("document_type") => {
                let text = field.text().await.map_err(|e| ApiError::bad_request(e.body_text()))?;
                if !text.trim().is_empty() {
                    form.document_type = Some(text.parse().map_err(ServiceError::from)?);
                }
            }
            _ => {}
        }
    }
    Ok(form)
}

#[utoipa::path(post, path = "/documents/upload", tag = "documents", security(("bearer" = [])),
    request_body(content = crate::openapi::DocumentFormDoc, content_type = "multipart/form-data"),
    responses((status = 200, description = "Stored", body = crate::openapi::DocumentDoc), (status = 400, description = "Invalid file type. Allowed types: PDF, JPG, PNG")))]
pub async fn upload(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    multipart: Multipart,
) -> Result<Json<document::Model>, ApiError> {
    let form = read_form(multipart).await?;
    let file = form.file.ok_or_else(|| ApiError::bad_request("File is required"))?;
    let kind = form.document_type.unwrap_or_default();
    Ok(Json(document_service::upload_document(&state.db, state.storage.as_ref(), &caller, kind, file).await?))
}

#[utoipa::path(get, path = "/documents/", tag = "documents", security(("bearer" = [])),
    responses((status = 200, description = "Caller's documents", body = [crate::openapi::DocumentDoc])))]
pub async fn list_own(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<document::Model>>, ApiError> {
    Ok(Json(document_service::list_own(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(get, path = "/documents/all", tag = "documents", security(("bearer" = [])),
    responses((status = 200, description = "Every document", body = [crate::openapi::DocumentDoc]), (status = 403, description = "Admins only")))]
pub async fn list_all(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<document::Model>>, ApiError> {
    Ok(Json(document_service::list_all(&state.db, &caller, page.into_pagination()).await?))
}

#[utoipa::path(put, path = "/documents/{id}", tag = "documents", security(("bearer" = [])), params(("id" = i32, Path, description = "Document id")),
    request_body(content = crate::openapi::DocumentFormDoc, content_type = "multipart/form-data"),
    responses((status = 200, description = "Updated", body = crate::openapi::DocumentDoc)))]
pub async fn update(
    State(state): State<AppState>,
    CurrentMechanic(caller): CurrentMechanic,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<document::Model>, ApiError> {
    let form = read_form(multipart).await?;
    let updated =
        document_service::update_document(&state.db, state.storage.as_ref(), &caller, id, form.document_type, form.file).await?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/documents/{id}", tag = "documents", security(("bearer" = [])), params(("id" = i32, Path, description = "Document id")),
    responses((status = 200, description = "Deleted")))]
pub async fn remove(State(state): State<AppState>, CurrentMechanic(caller): CurrentMechanic, Path(id): Path<i32>) -> Result<Json<Detail>, ApiError> {
    document_service::delete_document(&state.db, state.storage.as_ref(), &caller, id).await?;
    Ok(Json(Detail::new("Document deleted successfully")))
}
