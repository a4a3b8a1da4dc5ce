use async_trait::async_trait;

use super::errors::AuthError;
use super::principal::Principal;

/// Principal lookup for one identity space.
#[async_trait]
pub trait PrincipalRepository: Send + Sync {
    type Principal: Principal;

    async fn find_by_identity(&self, identity: &str) -> Result<Option<Self::Principal>, AuthError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Self::Principal>, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    pub struct MockPrincipalRepository<P> {
        principals: Mutex<Vec<P>>,
    }

    impl<P> Default for MockPrincipalRepository<P> {
        fn default() -> Self { Self { principals: Mutex::new(Vec::new()) } }
    }

    impl<P: Principal> MockPrincipalRepository<P> {
        pub fn insert(&self, principal: P) {
            self.principals.lock().unwrap().push(principal);
        }

        pub fn remove(&self, id: i32) {
            self.principals.lock().unwrap().retain(|p| p.id() != id);
        }
    }

    #[async_trait]
    impl<P: Principal> PrincipalRepository for MockPrincipalRepository<P> {
        type Principal = P;

        async fn find_by_identity(&self, identity: &str) -> Result<Option<P>, AuthError> {
            let principals = self.principals.lock().unwrap();
            Ok(principals.iter().find(|p| p.identity() == identity).cloned())
        }

        async fn find_by_id(&self, id: i32) -> Result<Option<P>, AuthError> {
            let principals = self.principals.lock().unwrap();
            Ok(principals.iter().find(|p| p.id() == id).cloned())
        }
    }
}
