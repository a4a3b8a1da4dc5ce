//! Service layer for the car service backend.
//! - Business rules and permission checks live here, handlers stay thin.
//! - Entities and field-level validation come from the `models` crate.
//! - Every operation returns `ServiceError`, which the HTTP layer maps to a status.

pub mod errors;
pub mod auth;
pub mod listing;
pub mod runtime;
pub mod storage;
pub mod notify;
pub mod user_service;
pub mod mechanic_service;
pub mod car_service;
pub mod catalog_service;
pub mod document_service;
pub mod appointment;
#[cfg(test)]
pub mod test_support;
