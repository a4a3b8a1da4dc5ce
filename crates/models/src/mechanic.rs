use chrono::{Datelike, NaiveDate};
use sea_orm::{entity::prelude::*, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::{appointment, document, errors};

pub const MIN_AGE: i32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum MechanicRole {
    #[sea_orm(string_value = "admin")]
    #[serde(alias = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "mechanic")]
    #[serde(alias = "MECHANIC")]
    Mechanic,
}

impl Default for MechanicRole {
    fn default() -> Self { MechanicRole::Mechanic }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mechanics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub birth_date: Date,
    #[sea_orm(unique)]
    pub login: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: MechanicRole,
    pub position: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    pub fn is_admin(&self) -> bool { self.role == MechanicRole::Admin }
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Document,
    Appointment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Document => Entity::has_many(document::Entity).into(),
            Relation::Appointment => Entity::has_many(appointment::Entity).into(),
        }
    }
}

impl Related<document::Entity> for Entity {
    fn to() -> RelationDef { Relation::Document.def() }
}

impl Related<appointment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Appointment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Full years between `birth_date` and `today`.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth_date.year();
    if (today.month(), today.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

pub fn ensure_adult(birth_date: NaiveDate, today: NaiveDate) -> Result<(), errors::ModelError> {
    if age_on(birth_date, today) < MIN_AGE {
        return Err(errors::ModelError::Validation("Mechanic must be at least 18 years old".into()));
    }
    Ok(())
}

pub async fn find_by_login(db: &DatabaseConnection, login: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Login.eq(login))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
