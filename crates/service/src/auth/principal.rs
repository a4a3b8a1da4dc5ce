use models::{mechanic, user};

use super::domain::PrincipalKind;

/// An authenticated actor. Implemented by the user and mechanic entities.
pub trait Principal: Clone + Send + Sync + 'static {
    const KIND: PrincipalKind;

    fn id(&self) -> i32;
    /// Login identity (email for users, login for mechanics).
    fn identity(&self) -> &str;
    fn password_hash(&self) -> &str;
    fn is_admin(&self) -> bool;
}

impl Principal for user::Model {
    const KIND: PrincipalKind = PrincipalKind::User;

    fn id(&self) -> i32 { self.id }
    fn identity(&self) -> &str { &self.email }
    fn password_hash(&self) -> &str { &self.password_hash }
    fn is_admin(&self) -> bool { user::Model::is_admin(self) }
}

impl Principal for mechanic::Model {
    const KIND: PrincipalKind = PrincipalKind::Mechanic;

    fn id(&self) -> i32 { self.id }
    fn identity(&self) -> &str { &self.login }
    fn password_hash(&self) -> &str { &self.password_hash }
    fn is_admin(&self) -> bool { mechanic::Model::is_admin(self) }
}
