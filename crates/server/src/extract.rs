//! Bearer-token extractors, one per identity space.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use tracing::debug;

use models::{mechanic, user};

use crate::errors::ApiError;
use crate::state::AppState;

async fn bearer(parts: &mut Parts, state: &AppState) -> Result<String, ApiError> {
    let TypedHeader(Authorization(token)) = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .map_err(|e| {
            debug!(error = %e, "missing or malformed bearer header");
            ApiError::unauthenticated()
        })?;
    Ok(token.token().to_string())
}

/// Authenticated user principal.
pub struct CurrentUser(pub user::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts, state).await?;
        let principal = state.users.resolve(&token).await?;
        Ok(CurrentUser(principal))
    }
}

/// Authenticated mechanic principal.
pub struct CurrentMechanic(pub mechanic::Model);

#[async_trait]
impl FromRequestParts<AppState> for CurrentMechanic {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer(parts, state).await?;
        let principal = state.mechanics.resolve(&token).await?;
        Ok(CurrentMechanic(principal))
    }
}
