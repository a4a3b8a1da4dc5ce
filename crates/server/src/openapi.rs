//! OpenAPI document served at `/api-docs/openapi.json`.
//!
//! The request and response types live in the service and models crates, so
//! the schemas below mirror their JSON shape for documentation only.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct DetailDoc { pub detail: String }

#[derive(ToSchema)]
pub struct AccessTokenDoc { pub access_token: String, pub token_type: String }

#[derive(ToSchema)]
pub struct RegisterUserDoc {
    pub name: String,
    pub email: String,
    pub password: String,
    /// `admin` or `customer` (default).
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct UserLoginDoc { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct UserPatchDoc { pub name: Option<String>, pub email: Option<String>, pub role: Option<String> }

#[derive(ToSchema)]
pub struct UserDoc { pub id: i32, pub name: String, pub email: String, pub role: String, pub created_at: String, pub updated_at: String }

#[derive(ToSchema)]
pub struct RegisterMechanicDoc {
    pub name: String,
    /// `YYYY-MM-DD`; must be at least 18 years ago.
    pub birth_date: String,
    pub login: String,
    pub password: String,
    pub role: Option<String>,
    pub position: String,
}

#[derive(ToSchema)]
pub struct MechanicLoginDoc { pub login: String, pub password: String }

#[derive(ToSchema)]
pub struct MechanicPatchDoc {
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub login: Option<String>,
    pub position: Option<String>,
    pub role: Option<String>,
}

#[derive(ToSchema)]
pub struct MechanicDoc { pub id: i32, pub name: String, pub birth_date: String, pub login: String, pub role: String, pub position: String }

#[derive(ToSchema)]
pub struct NewCarDoc { pub brand: String, pub model: String, pub year: i32, pub plate_number: String, pub vin: String, pub user_id: Option<i32> }

#[derive(ToSchema)]
pub struct CarPatchDoc {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub plate_number: Option<String>,
    pub vin: Option<String>,
}

#[derive(ToSchema)]
pub struct CarDoc { pub id: i32, pub user_id: i32, pub brand: String, pub model: String, pub year: i32, pub plate_number: String, pub vin: String }

#[derive(ToSchema)]
pub struct NewServiceDoc {
    pub name: String,
    pub description: Option<String>,
    /// Decimal with at most two fractional digits.
    pub price: String,
    /// Minutes.
    pub duration: i32,
}

#[derive(ToSchema)]
pub struct ServicePatchDoc { pub name: Option<String>, pub description: Option<String>, pub price: Option<String>, pub duration: Option<i32> }

#[derive(ToSchema)]
pub struct ServiceDoc { pub id: i32, pub name: String, pub description: Option<String>, pub price: String, pub duration: i32 }

#[derive(ToSchema)]
pub struct DocumentFormDoc {
    #[schema(format = Binary)]
    pub file: String,
    /// `passport` (default), `tax_id`, `diploma` or `employment_contract`.
    pub document_type: Option<String>,
}

#[derive(ToSchema)]
pub struct DocumentDoc { pub id: i32, pub mechanic_id: i32, pub document_type: String, pub file_path: String }

#[derive(ToSchema)]
pub struct NewAppointmentDoc {
    pub car_id: i32,
    pub service_id: i32,
    /// RFC 3339 timestamp in the future.
    pub appointment_date: String,
}

#[derive(ToSchema)]
pub struct AppointmentPatchDoc {
    pub car_id: Option<i32>,
    pub service_id: Option<i32>,
    pub appointment_date: Option<String>,
    /// Admin users only.
    pub status: Option<String>,
}

#[derive(ToSchema)]
pub struct AppointmentDoc {
    pub id: i32,
    pub user_id: i32,
    pub car_id: i32,
    pub service_id: i32,
    pub mechanic_id: Option<i32>,
    pub appointment_date: String,
    pub status: String,
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::login,
        crate::routes::users::me,
        crate::routes::users::list,
        crate::routes::users::update,
        crate::routes::users::remove,
        crate::routes::mechanics::register,
        crate::routes::mechanics::login,
        crate::routes::mechanics::me,
        crate::routes::mechanics::list,
        crate::routes::mechanics::assigned_appointments,
        crate::routes::mechanics::update,
        crate::routes::mechanics::remove,
        crate::routes::cars::create,
        crate::routes::cars::list,
        crate::routes::cars::read,
        crate::routes::cars::update,
        crate::routes::cars::remove,
        crate::routes::services::create,
        crate::routes::services::list,
        crate::routes::services::search,
        crate::routes::services::read,
        crate::routes::services::update,
        crate::routes::services::remove,
        crate::routes::documents::upload,
        crate::routes::documents::list_own,
        crate::routes::documents::list_all,
        crate::routes::documents::update,
        crate::routes::documents::remove,
        crate::routes::appointments::create,
        crate::routes::appointments::list,
        crate::routes::appointments::update,
        crate::routes::appointments::cancel,
        crate::routes::appointments::assign_mechanic,
    ),
    components(
        schemas(
            HealthResponse, DetailDoc, AccessTokenDoc,
            RegisterUserDoc, UserLoginDoc, UserPatchDoc, UserDoc,
            RegisterMechanicDoc, MechanicLoginDoc, MechanicPatchDoc, MechanicDoc,
            NewCarDoc, CarPatchDoc, CarDoc,
            NewServiceDoc, ServicePatchDoc, ServiceDoc,
            DocumentFormDoc, DocumentDoc,
            NewAppointmentDoc, AppointmentPatchDoc, AppointmentDoc,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "mechanics"),
        (name = "cars"),
        (name = "services"),
        (name = "documents"),
        (name = "appointments")
    )
)]
pub struct ApiDoc;
