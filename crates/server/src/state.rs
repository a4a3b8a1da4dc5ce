use std::sync::Arc;

use sea_orm::DatabaseConnection;

use configs::AppConfig;
use service::auth::repo::seaorm::{SeaOrmMechanicRepository, SeaOrmUserRepository};
use service::auth::{AuthService, TokenIssuer};
use service::notify::Notifier;
use service::storage::DocumentStorage;

/// Shared per-request state; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub users: Arc<AuthService<SeaOrmUserRepository>>,
    pub mechanics: Arc<AuthService<SeaOrmMechanicRepository>>,
    pub storage: Arc<dyn DocumentStorage>,
    pub notifier: Arc<dyn Notifier>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        cfg: &AppConfig,
        storage: Arc<dyn DocumentStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let tokens = TokenIssuer::from_config(&cfg.auth);
        let users = AuthService::new(Arc::new(SeaOrmUserRepository { db: db.clone() }), tokens.clone());
        let mechanics = AuthService::new(Arc::new(SeaOrmMechanicRepository { db: db.clone() }), tokens);
        Self {
            db,
            users: Arc::new(users),
            mechanics: Arc::new(mechanics),
            storage,
            notifier,
            max_upload_bytes: cfg.storage.max_upload_bytes,
        }
    }
}
