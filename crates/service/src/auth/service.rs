use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::AccessToken;
use super::errors::AuthError;
use super::password::verify_password;
use super::principal::Principal;
use super::repository::PrincipalRepository;
use super::token::TokenIssuer;

/// Auth business service independent of web framework, one per identity space.
pub struct AuthService<R: PrincipalRepository> {
    repo: Arc<R>,
    tokens: TokenIssuer,
}

impl<R: PrincipalRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenIssuer) -> Self { Self { repo, tokens } }

    /// Check a password and issue a bearer token.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::{AuthService, TokenIssuer, password::hash_password};
    /// use service::auth::repository::mock::MockPrincipalRepository;
    /// use models::user::{Model, UserRole};
    ///
    /// let repo = Arc::new(MockPrincipalRepository::<Model>::default());
    /// let now = chrono::Utc::now().into();
    /// repo.insert(Model {
    ///     id: 1,
    ///     name: "Ann".into(),
    ///     email: "ann@example.com".into(),
    ///     password_hash: hash_password("Secret123").unwrap(),
    ///     role: UserRole::Customer,
    ///     created_at: now,
    ///     updated_at: now,
    /// });
    /// let svc = AuthService::new(repo, TokenIssuer::new("secret", 30));
    /// let (user, token) = tokio_test::block_on(svc.authenticate("ann@example.com", "Secret123")).unwrap();
    /// assert_eq!(user.id, 1);
    /// assert_eq!(token.token_type, "bearer");
    /// ```
    #[instrument(skip(self, password), fields(identity = %identity))]
    pub async fn authenticate(&self, identity: &str, password: &str) -> Result<(R::Principal, AccessToken), AuthError> {
        let kind = <R::Principal as Principal>::KIND;
        let invalid = || AuthError::InvalidCredentials(kind.invalid_credentials_message().into());

        let principal = self.repo.find_by_identity(identity).await?.ok_or_else(invalid)?;
        if !verify_password(password, principal.password_hash())? {
            debug!(%kind, "password mismatch");
            return Err(invalid());
        }

        let token = self.tokens.issue(kind, principal.id())?;
        info!(%kind, principal_id = principal.id(), "principal_authenticated");
        Ok((principal, token))
    }

    /// Resolve a bearer token to a live principal of this identity space.
    #[instrument(skip_all)]
    pub async fn resolve(&self, token: &str) -> Result<R::Principal, AuthError> {
        let kind = <R::Principal as Principal>::KIND;
        let id = self.tokens.verify(token, kind)?;
        match self.repo.find_by_id(id).await? {
            Some(p) => Ok(p),
            None => {
                debug!(%kind, principal_id = id, "token subject no longer exists");
                Err(AuthError::Unauthenticated)
            }
        }
    }

    pub fn tokens(&self) -> &TokenIssuer { &self.tokens }
}
