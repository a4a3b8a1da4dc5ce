

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::{car, mechanic, user};

pub(crate) async fn insert_user(db: &DatabaseConnection, email: &str) -> anyhow::Result<user::Model> {
    let now = Utc::now().into();
    let am = user::ActiveModel {
        name: Set("Test User".into()),
        email: Set(email.into()),
        password_hash: Set("hash".into()),
        role: Set(user::UserRole::Customer),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn insert_car(db: &DatabaseConnection, user_id: i32, plate: &str, vin: &str) -> anyhow::Result<car::Model> {
    let now = Utc::now().into();
    let am = car::ActiveModel {
        user_id: Set(user_id),
        brand: Set("Toyota".into()),
        model: Set("Corolla".into()),
        year: Set(2020),
        plate_number: Set(plate.into()),
        vin: Set(vin.into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub(crate) async fn insert_mechanic(db: &DatabaseConnection, login: &str) -> anyhow::Result<mechanic::Model> {
    let now = Utc::now().into();
    let am = mechanic::ActiveModel {
        name: Set("Mech".into()),
        birth_date: Set(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
        login: Set(login.into()),
        password_hash: Set("hash".into()),
        role: Set(mechanic::MechanicRole::Mechanic),
        position: Set("Technician".into()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
