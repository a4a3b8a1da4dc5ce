#![cfg(test)]
//! Fixtures for DB-backed service tests. Each call to `get_db` returns a
//! fresh, migrated in-memory database so tests never share rows.

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;

use models::{car, mechanic, service, user};

use crate::{car_service, catalog_service, mechanic_service, user_service};

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_sqlite_memory().await
}

pub async fn user(db: &DatabaseConnection, email: &str, role: user::UserRole) -> user::Model {
    user_service::register(
        db,
        user_service::RegisterUser {
            name: "Test User".into(),
            email: email.into(),
            password: "Secret123".into(),
            role: Some(role),
        },
    )
    .await
    .expect("register user")
}

pub async fn mechanic(db: &DatabaseConnection, login: &str, role: mechanic::MechanicRole) -> mechanic::Model {
    mechanic_service::register(
        db,
        mechanic_service::RegisterMechanic {
            name: "Test Mechanic".into(),
            birth_date: NaiveDate::from_ymd_opt(1985, 5, 20).unwrap(),
            login: login.into(),
            password: "Password1".into(),
            role: Some(role),
            position: "Technician".into(),
        },
    )
    .await
    .expect("register mechanic")
}

pub async fn car(db: &DatabaseConnection, owner: &user::Model, plate: &str, vin: &str) -> car::Model {
    car_service::create_car(
        db,
        owner,
        car_service::NewCar {
            brand: "Toyota".into(),
            model: "Corolla".into(),
            year: 2019,
            plate_number: plate.into(),
            vin: vin.into(),
            user_id: None,
        },
    )
    .await
    .expect("create car")
}

pub async fn catalog_entry(db: &DatabaseConnection, admin: &user::Model, name: &str, cents: i64) -> service::Model {
    catalog_service::create_service(
        db,
        admin,
        catalog_service::NewService {
            name: name.into(),
            description: None,
            price: Decimal::new(cents, 2),
            duration: 60,
        },
    )
    .await
    .expect("create service")
}

pub fn tomorrow() -> chrono::DateTime<chrono::FixedOffset> {
    (Utc::now() + Duration::days(1)).into()
}
