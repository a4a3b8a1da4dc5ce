use sea_orm::{DatabaseConnection, EntityTrait};

use models::{mechanic, user};

use crate::auth::errors::AuthError;
use crate::auth::repository::PrincipalRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl PrincipalRepository for SeaOrmUserRepository {
    type Principal = user::Model;

    async fn find_by_identity(&self, identity: &str) -> Result<Option<user::Model>, AuthError> {
        user::find_by_email(&self.db, identity)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<user::Model>, AuthError> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}

pub struct SeaOrmMechanicRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl PrincipalRepository for SeaOrmMechanicRepository {
    type Principal = mechanic::Model;

    async fn find_by_identity(&self, identity: &str) -> Result<Option<mechanic::Model>, AuthError> {
        mechanic::find_by_login(&self.db, identity)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<mechanic::Model>, AuthError> {
        mechanic::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))
    }
}
