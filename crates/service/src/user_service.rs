use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use common::pagination::Pagination;
use models::user::{self, UserRole};

use crate::auth::password::hash_password;
use crate::errors::{conflict_on, ServiceError};
use crate::listing::fetch_list;

const EMAIL_TAKEN: &str = "Email already registered";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UserPatch {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

async fn ensure_email_free(db: &DatabaseConnection, email: &str, except: Option<i32>) -> Result<(), ServiceError> {
    let mut q = user::Entity::find().filter(user::Column::Email.eq(email));
    if let Some(id) = except {
        q = q.filter(user::Column::Id.ne(id));
    }
    if q.one(db).await?.is_some() {
        return Err(ServiceError::Conflict(EMAIL_TAKEN.into()));
    }
    Ok(())
}

/// Register a customer (or admin) account with a hashed password.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn register(db: &DatabaseConnection, input: RegisterUser) -> Result<user::Model, ServiceError> {
    input.validate()?;
    ensure_email_free(db, &input.email, None).await?;

    let hash = hash_password(&input.password)?;
    let now = Utc::now().into();
    let am = user::ActiveModel {
        name: Set(input.name),
        email: Set(input.email),
        password_hash: Set(hash),
        role: Set(input.role.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    // the unique index is the real guard when two registrations race
    let created = am.insert(db).await.map_err(|e| conflict_on(e, &[("email", EMAIL_TAKEN)]))?;
    info!(user_id = created.id, role = ?created.role, "user_registered");
    Ok(created)
}

/// Get a user by id.
pub async fn get_user(db: &DatabaseConnection, id: i32) -> Result<user::Model, ServiceError> {
    user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("User"))
}

/// Admin-only listing of every account.
pub async fn list_users(db: &DatabaseConnection, caller: &user::Model, page: Option<Pagination>) -> Result<Vec<user::Model>, ServiceError> {
    if !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    fetch_list(db, user::Entity::find().order_by_asc(user::Column::Id), page).await
}

/// Update self, or anyone when the caller is an admin. Role changes need admin.
#[instrument(skip(db, caller, patch), fields(caller_id = caller.id))]
pub async fn update_user(db: &DatabaseConnection, caller: &user::Model, id: i32, patch: UserPatch) -> Result<user::Model, ServiceError> {
    if caller.id != id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    patch.validate()?;
    if patch.role.is_some() && !caller.is_admin() {
        return Err(ServiceError::Forbidden("Only admins can change roles".into()));
    }

    let mut am: user::ActiveModel = get_user(db, id).await?.into();
    if let Some(email) = patch.email {
        ensure_email_free(db, &email, Some(id)).await?;
        am.email = Set(email);
    }
    if let Some(name) = patch.name { am.name = Set(name); }
    if let Some(role) = patch.role { am.role = Set(role); }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| conflict_on(e, &[("email", EMAIL_TAKEN)]))?;
    info!(user_id = updated.id, "user_updated");
    Ok(updated)
}

/// Delete self, or anyone when the caller is an admin. Cars and appointments go with it.
pub async fn delete_user(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<(), ServiceError> {
    if caller.id != id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("User"));
    }
    info!(user_id = id, deleted_by = caller.id, "user_deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, get_db};

    fn input(email: &str) -> RegisterUser {
        RegisterUser { name: "Ann".into(), email: email.into(), password: "Secret123".into(), role: None }
    }

    #[tokio::test]
    async fn duplicate_registration_conflicts_once() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let first = register(&db, input("ann@example.com")).await?;
        assert_eq!(first.role, UserRole::Customer);
        assert_ne!(first.password_hash, "Secret123");

        let err = register(&db, input("ann@example.com")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == EMAIL_TAKEN));
        assert_eq!(user::Entity::find().all(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn registration_validates_before_touching_db() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let mut bad = input("not-an-email");
        bad.password = "123".into();
        assert!(matches!(register(&db, bad).await, Err(ServiceError::Validation(_))));
        Ok(())
    }

    #[tokio::test]
    async fn update_rules() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = test_support::user(&db, "root@example.com", UserRole::Admin).await;
        let ann = test_support::user(&db, "ann@example.com", UserRole::Customer).await;
        let bob = test_support::user(&db, "bob@example.com", UserRole::Customer).await;

        // partial update keeps untouched fields
        let renamed = update_user(&db, &ann, ann.id, UserPatch { name: Some("Annie".into()), ..Default::default() }).await?;
        assert_eq!(renamed.name, "Annie");
        assert_eq!(renamed.email, "ann@example.com");

        let err = update_user(&db, &bob, ann.id, UserPatch { name: Some("Hacked".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = update_user(&db, &ann, ann.id, UserPatch { role: Some(UserRole::Admin), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let err = update_user(&db, &ann, ann.id, UserPatch { email: Some("bob@example.com".into()), ..Default::default() }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        let promoted = update_user(&db, &admin, bob.id, UserPatch { role: Some(UserRole::Admin), ..Default::default() }).await?;
        assert!(promoted.is_admin());
        Ok(())
    }

    #[tokio::test]
    async fn listing_and_deletion() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let admin = test_support::user(&db, "root@example.com", UserRole::Admin).await;
        let ann = test_support::user(&db, "ann@example.com", UserRole::Customer).await;

        assert!(matches!(list_users(&db, &ann, None).await, Err(ServiceError::Forbidden(_))));
        assert_eq!(list_users(&db, &admin, None).await?.len(), 2);
        let page = list_users(&db, &admin, Some(Pagination { page: 2, per_page: 1 })).await?;
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, ann.id);

        assert!(matches!(delete_user(&db, &ann, admin.id).await, Err(ServiceError::Forbidden(_))));
        delete_user(&db, &admin, ann.id).await?;
        assert!(matches!(get_user(&db, ann.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(delete_user(&db, &admin, ann.id).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
