use chrono::{Datelike, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use common::pagination::Pagination;
use models::{car, user};

use crate::errors::{conflict_on, ServiceError};
use crate::listing::fetch_list;

const VIN_TAKEN: &str = "VIN already exists";
const PLATE_TAKEN: &str = "Plate number already exists";
const UNIQUE_COLUMNS: [(&str, &str); 2] = [("vin", VIN_TAKEN), ("plate_number", PLATE_TAKEN)];
const VIEW_DENIED: &str = "You don't have permission to view this car";
const UPDATE_DENIED: &str = "You can only update your own cars";
const DELETE_DENIED: &str = "You can only delete your own cars";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCar {
    #[validate(length(min = 2, max = 100))]
    pub brand: String,
    #[validate(length(min = 2, max = 100))]
    pub model: String,
    pub year: i32,
    #[validate(length(min = 5, max = 20))]
    pub plate_number: String,
    #[validate(length(equal = 17))]
    pub vin: String,
    /// Owner; defaults to the caller. Only admins may register cars for others.
    #[serde(default)]
    pub user_id: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CarPatch {
    #[validate(length(min = 2, max = 100))]
    pub brand: Option<String>,
    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,
    pub year: Option<i32>,
    #[validate(length(min = 5, max = 20))]
    pub plate_number: Option<String>,
    #[validate(length(equal = 17))]
    pub vin: Option<String>,
}

fn current_year() -> i32 { Utc::now().year() }

async fn ensure_unique(
    db: &DatabaseConnection,
    vin: Option<&str>,
    plate: Option<&str>,
    except: Option<i32>,
) -> Result<(), ServiceError> {
    let checks = [(car::Column::Vin, vin, VIN_TAKEN), (car::Column::PlateNumber, plate, PLATE_TAKEN)];
    for (column, value, message) in checks {
        let Some(value) = value else { continue };
        let mut q = car::Entity::find().filter(column.eq(value));
        if let Some(id) = except {
            q = q.filter(car::Column::Id.ne(id));
        }
        if q.one(db).await?.is_some() {
            return Err(ServiceError::Conflict(message.into()));
        }
    }
    Ok(())
}

#[instrument(skip(db, caller, input), fields(caller_id = caller.id))]
pub async fn create_car(db: &DatabaseConnection, caller: &user::Model, input: NewCar) -> Result<car::Model, ServiceError> {
    input.validate()?;
    car::validate_year(input.year, current_year())?;

    let owner_id = input.user_id.unwrap_or(caller.id);
    if owner_id != caller.id {
        if !caller.is_admin() {
            return Err(ServiceError::Forbidden("You can only add cars to your own profile".into()));
        }
        if user::Entity::find_by_id(owner_id).one(db).await?.is_none() {
            return Err(ServiceError::not_found("User"));
        }
    }
    ensure_unique(db, Some(&input.vin), Some(&input.plate_number), None).await?;

    let now = Utc::now().into();
    let am = car::ActiveModel {
        user_id: Set(owner_id),
        brand: Set(input.brand),
        model: Set(input.model),
        year: Set(input.year),
        plate_number: Set(input.plate_number),
        vin: Set(input.vin),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = am.insert(db).await.map_err(|e| conflict_on(e, &UNIQUE_COLUMNS))?;
    info!(car_id = created.id, owner_id, "car_created");
    Ok(created)
}

async fn accessible_car(db: &DatabaseConnection, caller: &user::Model, id: i32, denied: &str) -> Result<car::Model, ServiceError> {
    let found = car::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Car"))?;
    if found.user_id != caller.id && !caller.is_admin() {
        return Err(ServiceError::Forbidden(denied.into()));
    }
    Ok(found)
}

/// Fetch a car the caller owns (or any car for admins).
pub async fn get_car(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<car::Model, ServiceError> {
    accessible_car(db, caller, id, VIEW_DENIED).await
}

/// Admins see every car, everyone else only their own.
pub async fn list_cars(db: &DatabaseConnection, caller: &user::Model, page: Option<Pagination>) -> Result<Vec<car::Model>, ServiceError> {
    let mut q = car::Entity::find().order_by_asc(car::Column::Id);
    if !caller.is_admin() {
        q = q.filter(car::Column::UserId.eq(caller.id));
    }
    fetch_list(db, q, page).await
}

#[instrument(skip(db, caller, patch), fields(caller_id = caller.id))]
pub async fn update_car(db: &DatabaseConnection, caller: &user::Model, id: i32, patch: CarPatch) -> Result<car::Model, ServiceError> {
    patch.validate()?;
    if let Some(year) = patch.year {
        car::validate_year(year, current_year())?;
    }
    let existing = accessible_car(db, caller, id, UPDATE_DENIED).await?;
    ensure_unique(db, patch.vin.as_deref(), patch.plate_number.as_deref(), Some(id)).await?;

    let mut am: car::ActiveModel = existing.into();
    if let Some(brand) = patch.brand { am.brand = Set(brand); }
    if let Some(model) = patch.model { am.model = Set(model); }
    if let Some(year) = patch.year { am.year = Set(year); }
    if let Some(plate) = patch.plate_number { am.plate_number = Set(plate); }
    if let Some(vin) = patch.vin { am.vin = Set(vin); }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await.map_err(|e| conflict_on(e, &UNIQUE_COLUMNS))?;
    info!(car_id = updated.id, "car_updated");
    Ok(updated)
}

/// Appointments booked for the car are removed with it.
pub async fn delete_car(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<(), ServiceError> {
    let existing = accessible_car(db, caller, id, DELETE_DENIED).await?;
    car::Entity::delete_by_id(existing.id).exec(db).await?;
    info!(car_id = id, deleted_by = caller.id, "car_deleted");
    Ok(())
}
