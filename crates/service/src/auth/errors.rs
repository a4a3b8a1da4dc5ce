use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Login failed; the message names the identity field for the space.
    #[error("{0}")]
    InvalidCredentials(String),
    /// Missing, malformed, expired or foreign token, or the principal is gone.
    #[error("could not validate credentials")]
    Unauthenticated,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}
