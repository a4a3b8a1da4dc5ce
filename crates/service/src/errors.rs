use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::auth::errors::AuthError;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthenticated(String),
    #[error("{0}")]
    InvalidTransition(String),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("database error: {0}")]
    Db(String),
    #[error(transparent)]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn forbidden() -> Self { Self::Forbidden("Not authorized".into()) }

    /// True for failures the caller cannot fix (persistence or storage).
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            ServiceError::Db(_) | ServiceError::Storage(_) | ServiceError::Model(models::errors::ModelError::Db(_))
        )
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                ServiceError::Conflict(format!("Duplicate value violates a unique constraint: {msg}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                ServiceError::Conflict("Record is referenced by or references missing data".into())
            }
            _ => ServiceError::Db(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = e
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reasons: Vec<String> = errs
                    .iter()
                    .map(|err| err.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| err.code.to_string()))
                    .collect();
                format!("{field}: {}", reasons.join(", "))
            })
            .collect();
        parts.sort();
        ServiceError::Validation(parts.join("; "))
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidCredentials(m) => ServiceError::Unauthenticated(m),
            AuthError::Unauthenticated => ServiceError::Unauthenticated("Could not validate credentials".into()),
            AuthError::HashError(m) | AuthError::TokenError(m) | AuthError::Repository(m) => ServiceError::Db(m),
        }
    }
}

/// Map a unique-constraint violation to a specific conflict message by looking
/// for the offending column in the driver's message; everything else goes
/// through the generic conversion.
pub(crate) fn conflict_on(e: DbErr, columns: &[(&str, &str)]) -> ServiceError {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        let lower = msg.to_lowercase();
        for (column, message) in columns {
            if lower.contains(column) {
                return ServiceError::Conflict((*message).to_string());
            }
        }
    }
    ServiceError::from(e)
}
