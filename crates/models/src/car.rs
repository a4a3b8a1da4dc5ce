use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{appointment, errors, user};

pub const MIN_YEAR: i32 = 1900;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cars")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[sea_orm(unique)]
    pub plate_number: String,
    #[sea_orm(unique)]
    pub vin: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Appointment,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity).from(Column::UserId).to(user::Column::Id).into(),
            Relation::Appointment => Entity::has_many(appointment::Entity).into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<appointment::Entity> for Entity {
    fn to() -> RelationDef { Relation::Appointment.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Model years run from 1900 up to next year's models.
pub fn validate_year(year: i32, current_year: i32) -> Result<(), errors::ModelError> {
    if year < MIN_YEAR || year > current_year + 1 {
        return Err(errors::ModelError::Validation(format!(
            "Year must be between {MIN_YEAR} and {}",
            current_year + 1
        )));
    }
    Ok(())
}
