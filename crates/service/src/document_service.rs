//! Mechanic documents: metadata rows in the database, bytes in `DocumentStorage`.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument, warn};

use common::pagination::Pagination;
use models::document::{self, DocumentType};
use models::mechanic;

use crate::errors::ServiceError;
use crate::listing::fetch_list;
use crate::storage::DocumentStorage;

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

async fn store_checked(storage: &dyn DocumentStorage, file: &UploadedFile) -> Result<String, ServiceError> {
    document::ensure_allowed_extension(&file.file_name)?;
    Ok(storage.store(&file.file_name, &file.bytes).await?)
}

/// Best effort; the row change already succeeded or failed on its own.
pub(crate) async fn discard(storage: &dyn DocumentStorage, path: &str) {
    if let Err(e) = storage.remove(path).await {
        warn!(path, error = %e, "document_file_cleanup_failed");
    }
}

#[instrument(skip(db, storage, caller, file), fields(mechanic_id = caller.id, file_name = %file.file_name))]
pub async fn upload_document(
    db: &DatabaseConnection,
    storage: &dyn DocumentStorage,
    caller: &mechanic::Model,
    document_type: DocumentType,
    file: UploadedFile,
) -> Result<document::Model, ServiceError> {
    let path = store_checked(storage, &file).await?;

    let now = Utc::now().into();
    let am = document::ActiveModel {
        mechanic_id: Set(caller.id),
        document_type: Set(document_type),
        file_path: Set(path.clone()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    match am.insert(db).await {
        Ok(created) => {
            info!(document_id = created.id, %document_type, "document_uploaded");
            Ok(created)
        }
        Err(e) => {
            discard(storage, &path).await;
            Err(e.into())
        }
    }
}

/// The caller's own documents.
pub async fn list_own(db: &DatabaseConnection, caller: &mechanic::Model, page: Option<Pagination>) -> Result<Vec<document::Model>, ServiceError> {
    let q = document::Entity::find()
        .filter(document::Column::MechanicId.eq(caller.id))
        .order_by_asc(document::Column::Id);
    fetch_list(db, q, page).await
}

pub async fn list_all(db: &DatabaseConnection, caller: &mechanic::Model, page: Option<Pagination>) -> Result<Vec<document::Model>, ServiceError> {
    if !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    fetch_list(db, document::Entity::find().order_by_asc(document::Column::Id), page).await
}

async fn owned(db: &DatabaseConnection, caller: &mechanic::Model, id: i32) -> Result<document::Model, ServiceError> {
    let doc = document::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Document"))?;
    if doc.mechanic_id != caller.id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    Ok(doc)
}

/// Replace the file and/or the type. The old file is removed only after the
/// row points at the new one.
#[instrument(skip(db, storage, caller, file), fields(mechanic_id = caller.id))]
pub async fn update_document(
    db: &DatabaseConnection,
    storage: &dyn DocumentStorage,
    caller: &mechanic::Model,
    id: i32,
    document_type: Option<DocumentType>,
    file: Option<UploadedFile>,
) -> Result<document::Model, ServiceError> {
    let existing = owned(db, caller, id).await?;
    let old_path = existing.file_path.clone();

    let new_path = match file.as_ref() {
        Some(f) => Some(store_checked(storage, f).await?),
        None => None,
    };

    let mut am: document::ActiveModel = existing.into();
    if let Some(t) = document_type { am.document_type = Set(t); }
    if let Some(p) = new_path.as_ref() { am.file_path = Set(p.clone()); }
    am.updated_at = Set(Utc::now().into());

    let updated = match am.update(db).await {
        Ok(u) => u,
        Err(e) => {
            if let Some(p) = new_path.as_deref() {
                discard(storage, p).await;
            }
            return Err(e.into());
        }
    };
    if new_path.is_some() {
        discard(storage, &old_path).await;
    }
    info!(document_id = updated.id, "document_updated");
    Ok(updated)
}

pub async fn delete_document(
    db: &DatabaseConnection,
    storage: &dyn DocumentStorage,
    caller: &mechanic::Model,
    id: i32,
) -> Result<(), ServiceError> {
    let existing = owned(db, caller, id).await?;
    document::Entity::delete_by_id(existing.id).exec(db).await?;
    discard(storage, &existing.file_path).await;
    info!(document_id = id, deleted_by = caller.id, "document_deleted");
    Ok(())
}
