use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use serde::Deserialize;
use tracing::{info, instrument};

use common::pagination::Pagination;
use models::appointment::{self, AppointmentStatus};
use models::{car, mechanic, service, user};

use super::lifecycle;
use crate::errors::ServiceError;
use crate::listing::fetch_list;
use crate::notify::{self, AppointmentNotice, Notifier};

const NOT_YOUR_CAR: &str = "You can only book appointments for your own cars";

/// Booking request. A `status` sent by the client is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub car_id: i32,
    pub service_id: i32,
    pub appointment_date: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentPatch {
    pub car_id: Option<i32>,
    pub service_id: Option<i32>,
    pub appointment_date: Option<DateTime<FixedOffset>>,
    pub status: Option<AppointmentStatus>,
}

fn ensure_future(date: &DateTime<FixedOffset>) -> Result<(), ServiceError> {
    if *date <= Utc::now() {
        return Err(ServiceError::Validation("Appointment date must be in the future.".into()));
    }
    Ok(())
}

async fn owned_car(db: &DatabaseConnection, owner_id: i32, car_id: i32) -> Result<car::Model, ServiceError> {
    car::Entity::find_by_id(car_id)
        .filter(car::Column::UserId.eq(owner_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::Forbidden(NOT_YOUR_CAR.into()))
}

async fn existing_service(db: &DatabaseConnection, service_id: i32) -> Result<service::Model, ServiceError> {
    service::Entity::find_by_id(service_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Service"))
}

#[instrument(skip(db, notifier, caller, input), fields(user_id = caller.id, car_id = input.car_id))]
pub async fn create_appointment(
    db: &DatabaseConnection,
    notifier: &Arc<dyn Notifier>,
    caller: &user::Model,
    input: NewAppointment,
) -> Result<appointment::Model, ServiceError> {
    owned_car(db, caller.id, input.car_id).await?;
    let booked = existing_service(db, input.service_id).await?;
    ensure_future(&input.appointment_date)?;

    let now = Utc::now().into();
    let am = appointment::ActiveModel {
        user_id: Set(caller.id),
        car_id: Set(input.car_id),
        service_id: Set(input.service_id),
        mechanic_id: Set(None),
        appointment_date: Set(input.appointment_date),
        status: Set(AppointmentStatus::Pending),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = am.insert(db).await?;
    info!(appointment_id = created.id, service_id = created.service_id, "appointment_created");

    notify::dispatch(
        notifier.clone(),
        AppointmentNotice {
            appointment_id: created.id,
            recipient_name: caller.name.clone(),
            recipient_email: caller.email.clone(),
            service_name: booked.name,
            appointment_date: created.appointment_date,
            status: created.status,
        },
    );
    Ok(created)
}

/// Owner or admin user.
pub async fn get_appointment(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<appointment::Model, ServiceError> {
    let found = appointment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Appointment"))?;
    if found.user_id != caller.id && !caller.is_admin() {
        return Err(ServiceError::forbidden());
    }
    Ok(found)
}

pub async fn list_appointments(db: &DatabaseConnection, caller: &user::Model, page: Option<Pagination>) -> Result<Vec<appointment::Model>, ServiceError> {
    let mut q = appointment::Entity::find().order_by_asc(appointment::Column::AppointmentDate);
    if !caller.is_admin() {
        q = q.filter(appointment::Column::UserId.eq(caller.id));
    }
    fetch_list(db, q, page).await
}

/// Appointments assigned to the given mechanic.
pub async fn list_for_mechanic(db: &DatabaseConnection, caller: &mechanic::Model, page: Option<Pagination>) -> Result<Vec<appointment::Model>, ServiceError> {
    let q = appointment::Entity::find()
        .filter(appointment::Column::MechanicId.eq(caller.id))
        .order_by_asc(appointment::Column::AppointmentDate);
    fetch_list(db, q, page).await
}

#[instrument(skip(db, caller, patch), fields(user_id = caller.id))]
pub async fn update_appointment(
    db: &DatabaseConnection,
    caller: &user::Model,
    id: i32,
    patch: AppointmentPatch,
) -> Result<appointment::Model, ServiceError> {
    let existing = get_appointment(db, caller, id).await?;
    lifecycle::ensure_mutable(existing.status)?;

    let next_status = match patch.status {
        Some(to) if to != existing.status => {
            if !caller.is_admin() {
                return Err(ServiceError::Forbidden("Only admins can change appointment status".into()));
            }
            Some(lifecycle::set_status(existing.status, to)?)
        }
        _ => None,
    };
    if let Some(car_id) = patch.car_id {
        owned_car(db, existing.user_id, car_id).await?;
    }
    if let Some(service_id) = patch.service_id {
        existing_service(db, service_id).await?;
    }
    if let Some(date) = patch.appointment_date.as_ref() {
        ensure_future(date)?;
    }

    let from = existing.status;
    let mut am: appointment::ActiveModel = existing.into();
    if let Some(car_id) = patch.car_id { am.car_id = Set(car_id); }
    if let Some(service_id) = patch.service_id { am.service_id = Set(service_id); }
    if let Some(date) = patch.appointment_date { am.appointment_date = Set(date); }
    if let Some(status) = next_status { am.status = Set(status); }
    am.updated_at = Set(Utc::now().into());

    let updated = am.update(db).await?;
    if updated.status != from {
        info!(appointment_id = id, %from, to = %updated.status, "appointment_status_changed");
    }
    info!(appointment_id = id, "appointment_updated");
    Ok(updated)
}

#[instrument(skip(db, caller), fields(user_id = caller.id))]
pub async fn cancel_appointment(db: &DatabaseConnection, caller: &user::Model, id: i32) -> Result<appointment::Model, ServiceError> {
    let existing = get_appointment(db, caller, id).await?;
    let next = lifecycle::cancel(existing.status)?;

    let mut am: appointment::ActiveModel = existing.into();
    am.status = Set(next);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(appointment_id = id, "appointment_cancelled");
    Ok(updated)
}

/// Admin mechanics assign themselves (no `mechanic_id`) or another mechanic.
#[instrument(skip(db, caller), fields(caller_id = caller.id))]
pub async fn assign_mechanic(
    db: &DatabaseConnection,
    caller: &mechanic::Model,
    id: i32,
    mechanic_id: Option<i32>,
) -> Result<appointment::Model, ServiceError> {
    if !caller.is_admin() {
        return Err(ServiceError::Forbidden("Only admins can assign mechanics".into()));
    }
    let existing = appointment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("Appointment"))?;
    let next = lifecycle::assign_mechanic(existing.status)?;

    let assignee = match mechanic_id {
        None => caller.id,
        Some(mid) if mid == caller.id => mid,
        Some(mid) => {
            mechanic::Entity::find_by_id(mid)
                .one(db)
                .await?
                .ok_or_else(|| ServiceError::not_found("Mechanic"))?
                .id
        }
    };

    let mut am: appointment::ActiveModel = existing.into();
    am.mechanic_id = Set(Some(assignee));
    am.status = Set(next);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(appointment_id = id, mechanic_id = assignee, "mechanic_assigned");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;
    use crate::test_support::{self, get_db, tomorrow};
    use chrono::Duration;
    use models::mechanic::MechanicRole;
    use models::user::UserRole;

    struct Fixture {
        db: DatabaseConnection,
        notifier: Arc<RecordingNotifier>,
        ann: user::Model,
        root: user::Model,
        anns_car: car::Model,
        oil: service::Model,
    }

    async fn fixture() -> Result<Fixture, anyhow::Error> {
        let db = get_db().await?;
        let ann = test_support::user(&db, "ann@example.com", UserRole::Customer).await;
        let root = test_support::user(&db, "root@example.com", UserRole::Admin).await;
        let anns_car = test_support::car(&db, &ann, "AAA111", "1HGCM82633A000001").await;
        let oil = test_support::catalog_entry(&db, &root, "Oil Change", 4999).await;
        Ok(Fixture { db, notifier: Arc::new(RecordingNotifier::default()), ann, root, anns_car, oil })
    }

    impl Fixture {
        fn notifier(&self) -> Arc<dyn Notifier> { self.notifier.clone() }

        async fn book(&self) -> appointment::Model {
            let input = NewAppointment { car_id: self.anns_car.id, service_id: self.oil.id, appointment_date: tomorrow() };
            create_appointment(&self.db, &self.notifier(), &self.ann, input).await.unwrap()
        }
    }

    #[tokio::test]
    async fn booking_starts_pending_and_notifies() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let appt = f.book().await;
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.mechanic_id, None);
        assert_eq!(appt.user_id, f.ann.id);

        for _ in 0..50 {
            if !f.notifier.sent.lock().unwrap().is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let sent = f.notifier.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].service_name, "Oil Change");
        assert_eq!(sent[0].recipient_email, "ann@example.com");
        Ok(())
    }

    #[tokio::test]
    async fn booking_guards() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let bob = test_support::user(&f.db, "bob@example.com", UserRole::Customer).await;
        let notifier = f.notifier();

        let past = NewAppointment { car_id: f.anns_car.id, service_id: f.oil.id, appointment_date: (Utc::now() - Duration::hours(1)).into() };
        let err = create_appointment(&f.db, &notifier, &f.ann, past).await.unwrap_err();
        assert_eq!(err.to_string(), "Appointment date must be in the future.");

        let foreign = NewAppointment { car_id: f.anns_car.id, service_id: f.oil.id, appointment_date: tomorrow() };
        let err = create_appointment(&f.db, &notifier, &bob, foreign).await.unwrap_err();
        assert_eq!(err.to_string(), NOT_YOUR_CAR);

        let unknown = NewAppointment { car_id: f.anns_car.id, service_id: 999, appointment_date: tomorrow() };
        let err = create_appointment(&f.db, &notifier, &f.ann, unknown).await.unwrap_err();
        assert_eq!(err.to_string(), "Service not found");

        assert!(list_appointments(&f.db, &f.ann, None).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn assignment_rules() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let boss = test_support::mechanic(&f.db, "boss", MechanicRole::Admin).await;
        let mike = test_support::mechanic(&f.db, "mike", MechanicRole::Mechanic).await;
        let appt = f.book().await;

        let err = assign_mechanic(&f.db, &mike, appt.id, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Only admins can assign mechanics");
        assert!(matches!(assign_mechanic(&f.db, &boss, 4242, None).await, Err(ServiceError::NotFound(_))));
        let err = assign_mechanic(&f.db, &boss, appt.id, Some(4242)).await.unwrap_err();
        assert_eq!(err.to_string(), "Mechanic not found");

        let confirmed = assign_mechanic(&f.db, &boss, appt.id, None).await?;
        assert_eq!(confirmed.status, AppointmentStatus::Confirmed);
        assert_eq!(confirmed.mechanic_id, Some(boss.id));

        let reassigned = assign_mechanic(&f.db, &boss, appt.id, Some(mike.id)).await?;
        assert_eq!(reassigned.mechanic_id, Some(mike.id));
        assert_eq!(list_for_mechanic(&f.db, &mike, None).await?.len(), 1);
        assert!(list_for_mechanic(&f.db, &boss, None).await?.is_empty());

        cancel_appointment(&f.db, &f.ann, appt.id).await?;
        assert!(matches!(assign_mechanic(&f.db, &boss, appt.id, None).await, Err(ServiceError::InvalidTransition(_))));
        Ok(())
    }

    #[tokio::test]
    async fn updates_respect_ownership_and_status_rules() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let bob = test_support::user(&f.db, "bob@example.com", UserRole::Customer).await;
        let bobs_car = test_support::car(&f.db, &bob, "BBB222", "1HGCM82633A000002").await;
        let appt = f.book().await;

        let later = AppointmentPatch { appointment_date: Some(tomorrow() + Duration::days(2)), ..Default::default() };
        let moved = update_appointment(&f.db, &f.ann, appt.id, later.clone()).await?;
        assert!(moved.appointment_date > appt.appointment_date);

        assert!(matches!(update_appointment(&f.db, &bob, appt.id, later).await, Err(ServiceError::Forbidden(_))));
        let swap = AppointmentPatch { car_id: Some(bobs_car.id), ..Default::default() };
        assert_eq!(update_appointment(&f.db, &f.ann, appt.id, swap).await.unwrap_err().to_string(), NOT_YOUR_CAR);

        let self_confirm = AppointmentPatch { status: Some(AppointmentStatus::Completed), ..Default::default() };
        assert!(matches!(update_appointment(&f.db, &f.ann, appt.id, self_confirm.clone()).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(
            update_appointment(&f.db, &f.root, appt.id, self_confirm).await,
            Err(ServiceError::InvalidTransition(_))
        ));
        let same = AppointmentPatch { status: Some(AppointmentStatus::Pending), ..Default::default() };
        assert_eq!(update_appointment(&f.db, &f.ann, appt.id, same).await?.status, AppointmentStatus::Pending);

        let by_admin = AppointmentPatch { status: Some(AppointmentStatus::Cancelled), ..Default::default() };
        assert_eq!(update_appointment(&f.db, &f.root, appt.id, by_admin).await?.status, AppointmentStatus::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn terminal_appointments_stay_put() -> Result<(), anyhow::Error> {
        let f = fixture().await?;
        let appt = f.book().await;

        let cancelled = cancel_appointment(&f.db, &f.ann, appt.id).await?;
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
        let err = cancel_appointment(&f.db, &f.ann, appt.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Appointment is already cancelled");

        let edit = AppointmentPatch { service_id: Some(f.oil.id), ..Default::default() };
        assert!(matches!(update_appointment(&f.db, &f.ann, appt.id, edit).await, Err(ServiceError::InvalidTransition(_))));
        assert_eq!(get_appointment(&f.db, &f.ann, appt.id).await?.status, AppointmentStatus::Cancelled);
        assert_eq!(list_appointments(&f.db, &f.root, None).await?.len(), 1);
        Ok(())
    }
}
