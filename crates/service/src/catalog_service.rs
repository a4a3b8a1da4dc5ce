//! Service catalog: admin-managed entries, publicly readable and searchable.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use common::pagination::Pagination;
use models::{appointment, money, service, user};

use crate::errors::{conflict_on, ServiceError};
use crate::listing::fetch_list;

const NAME_TAKEN: &str = "Service with this name already exists";
const STILL_BOOKED: &str = "Service is referenced by existing appointments";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewService {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[validate(range(min = 1))]
    pub duration: i32,
}

/// `description: null` clears the description; an absent key leaves it alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ServicePatch {
    #[validate(length(min = 2, max = 100))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    #[validate(range(min = 1))]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceSearch {
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

fn ensure_admin(caller: &user::Model) -> Result<(), ServiceError> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden("Only administrators can manage services".into()))
    }
}

async fn ensure_name_free(db: &DatabaseConnection, name: &str, except: Option<i32>) -> Result<(), ServiceError> {
    let mut q = service::Entity::find().filter(service::Column::Name.eq(name));
    if let Some(id) = except {
        q = q.filter(service::Column::Id.ne(id));
    }
    if q.one(db).await?.is_some() {
        return Err(ServiceError::Conflict(NAME_TAKEN.into()));
    }
    Ok(())
}

#[instrument(skip(db, caller, input), fields(name = %input.name))]
pub async fn create_service(db: &DatabaseConnection, caller: &user::Model, input: NewService) -> Result<service::Model, ServiceError> {
    ensure_admin(caller)?;
    input.validate()?;
    service::validate_description(input.description.as_deref())?;
    let price = money::normalize_price(input.price)?;
    ensure_name_free(db, &input.name, None).await?;

    let now = Utc::now().into();
    let am = service::ActiveModel {
        name: Set(input.name),
        description: Set(input.description),
        price: Set(price),
        duration: Set(input.duration),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = am.insert(db).await.map_err(|e| conflict_on(e, &[("name", NAME_TAKEN)]))?;
    info!(service_id = created.id, "service_created");
    Ok(created)
}

pub async fn get_service(db: &DatabaseConnection, id: i32) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Service"))
}

pub async fn list_services(db: &DatabaseConnection, page: Option<Pagination>) -> Result<Vec<service::Model>, ServiceError> {
    fetch_list(db, service::Entity::find().order_by_asc(service::Column::Id), page).await
}

/// Case-insensitive name substring plus inclusive price bounds, ANDed.
pub async fn search_services(db: &DatabaseConnection, params: ServiceSearch) -> Result<Vec<service::Model>, ServiceError> {
    if let (Some(min), Some(max)) = (params.min_price, params.max_price) {
        if min > max {
            return Err(ServiceError::Validation("min_price cannot be greater than max_price".into()));
        }
    }
    let mut q = service::Entity::find();
    if let Some(name) = params.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let pattern = format!("%{}%", name.to_lowercase());
        q = q.filter(Expr::expr(Func::lower(Expr::col((service::Entity, service::Column::Name)))).like(pattern));
    }
    if let Some(min) = params.min_price {
        q = q.filter(service::Column::Price.gte(min));
    }
    if let Some(max) = params.max_price {
        q = q.filter(service::Column::Price.lte(max));
    }
    Ok(q.order_by_asc(service::Column::Price).all(db).await?)
}

#[instrument(skip(db, caller, patch), fields(service_id = id))]
pub async fn update_service(db: &DatabaseConnection, caller: &user::Model, id: i32, patch: ServicePatch) -> Result<service::Model, ServiceError> {
    ensure_admin(caller)?;
    patch.validate()?;
    if let Some(Some(description)) = patch.description.as_ref() {
        service::validate_description(Some(description))?;
    }
    let price = patch.price.map(money::normalize_price).transpose()?;

    let mut am: service::ActiveModel = get_service(db, id).await?.into();
    if let Some(name) = patch.name {
        ensure_name_free(db, &name, Some(id)).await?;
        am.name = Set(name);
    }
    if let Some(description) = patch.description { am.description = Set(description); }
    if let Some(price) = price { am.price = Set(price); }
    if let Some(duration) = patch.duration { am.duration = Set(duration); }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| conflict_on(e, &[("name", NAME_TAKEN)]))?;
    info!(service_id = updated.id, "service_updated");
    Ok(updated)
}

pub async fn delete_service(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<(), ServiceError> {
    ensure_admin(caller)?;
    let booked = appointment::Entity::find()
        .filter(appointment::Column::ServiceId.eq(id))
        .count(db)
        .await?;
    if booked > 0 {
        return Err(ServiceError::Conflict(STILL_BOOKED.into()));
    }
    // a booking inserted after the count still trips the foreign key
    let res = service::Entity::delete_by_id(id).exec(db).await.map_err(still_booked)?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("Service"));
    }
    info!(service_id = id, deleted_by = caller.id, "service_deleted");
    Ok(())
}

fn still_booked(e: DbErr) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::Conflict(STILL_BOOKED.into()),
        _ => ServiceError::from(e),
    }
}
