use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use common::pagination::Pagination;
use models::document;
use models::mechanic::{self, MechanicRole};

use crate::auth::password::hash_password;
use crate::document_service;
use crate::errors::{conflict_on, ServiceError};
use crate::listing::fetch_list;
use crate::storage::DocumentStorage;

const LOGIN_TAKEN: &str = "Login already registered";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterMechanic {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    pub birth_date: NaiveDate,
    #[validate(length(min = 3, max = 50))]
    pub login: String,
    #[validate(length(min = 8, max = 100))]
    pub password: String,
    #[serde(default)]
    pub role: Option<MechanicRole>,
    #[validate(length(min = 2, max = 100))]
    pub position: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MechanicPatch {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    #[validate(length(min = 3, max = 50))]
    pub login: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub position: Option<String>,
    pub role: Option<MechanicRole>,
}

fn today() -> NaiveDate { Utc::now().date_naive() }

async fn ensure_login_free(db: &DatabaseConnection, login: &str, except: Option<i32>) -> Result<(), ServiceError> {
    let mut q = mechanic::Entity::find().filter(mechanic::Column::Login.eq(login));
    if let Some(id) = except {
        q = q.filter(mechanic::Column::Id.ne(id));
    }
    if q.one(db).await?.is_some() {
        return Err(ServiceError::Conflict(LOGIN_TAKEN.into()));
    }
    Ok(())
}

#[instrument(skip(db, input), fields(login = %input.login))]
pub async fn register(db: &DatabaseConnection, input: RegisterMechanic) -> Result<mechanic::Model, ServiceError> {
    input.validate()?;
    mechanic::ensure_adult(input.birth_date, today())?;
    ensure_login_free(db, &input.login, None).await?;

    let hash = hash_password(&input.password)?;
    let now = Utc::now().into();
    let am = mechanic::ActiveModel {
        name: Set(input.name),
        birth_date: Set(input.birth_date),
        login: Set(input.login),
        password_hash: Set(hash),
        role: Set(input.role.unwrap_or_default()),
        position: Set(input.position),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = am.insert(db).await.map_err(|e| conflict_on(e, &[("login", LOGIN_TAKEN)]))?;
    info!(mechanic_id = created.id, role = ?created.role, "mechanic_registered");
    Ok(created)
}

pub async fn get_mechanic(db: &DatabaseConnection, id: i32) -> Result<mechanic::Model, ServiceError> {
    mechanic::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Mechanic"))
}

/// Admin-only listing of all mechanics.
pub async fn list_mechanics(db: &DatabaseConnection, caller: &mechanic::Model, page: Option<Pagination>) -> Result<Vec<mechanic::Model>, ServiceError> {
    if !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    fetch_list(db, mechanic::Entity::find().order_by_asc(mechanic::Column::Id), page).await
}

#[instrument(skip(db, caller, patch), fields(caller_id = caller.id))]
pub async fn update_mechanic(db: &DatabaseConnection, caller: &mechanic::Model, id: i32, patch: MechanicPatch) -> Result<mechanic::Model, ServiceError> {
    if caller.id != id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    patch.validate()?;
    if patch.role.is_some() && !caller.is_admin() {
        return Err(ServiceError::Forbidden("Only admins can change roles".into()));
    }
    if let Some(birth_date) = patch.birth_date {
        mechanic::ensure_adult(birth_date, today())?;
    }

    let mut am: mechanic::ActiveModel = get_mechanic(db, id).await?.into();
    if let Some(login) = patch.login {
        ensure_login_free(db, &login, Some(id)).await?;
        am.login = Set(login);
    }
    if let Some(name) = patch.name { am.name = Set(name); }
    if let Some(birth_date) = patch.birth_date { am.birth_date = Set(birth_date); }
    if let Some(position) = patch.position { am.position = Set(position); }
    if let Some(role) = patch.role { am.role = Set(role); }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| conflict_on(e, &[("login", LOGIN_TAKEN)]))?;
    info!(mechanic_id = updated.id, "mechanic_updated");
    Ok(updated)
}

/// Document rows cascade with the mechanic and their stored files are removed
/// afterwards; assigned appointments are unassigned.
pub async fn delete_mechanic(
    db: &DatabaseConnection,
    storage: &dyn DocumentStorage,
    caller: &mechanic::Model,
    id: i32,
) -> Result<(), ServiceError> {
    if caller.id != id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    let files: Vec<String> = document::Entity::find()
        .filter(document::Column::MechanicId.eq(id))
        .all(db)
        .await?
        .into_iter()
        .map(|d| d.file_path)
        .collect();
    let res = mechanic::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("Mechanic"));
    }
    for path in &files {
        document_service::discard(storage, path).await;
    }
    info!(mechanic_id = id, deleted_by = caller.id, documents = files.len(), "mechanic_deleted");
    Ok(())
}
