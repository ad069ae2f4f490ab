use crate::db::{Database, DbError, ExistingUser, InsertResult};
use async_trait::async_trait;

/// Storage seam used by the registration workflow.
///
/// [`Database`] is the production implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// One combined lookup of both fields.
    async fn check_existing(&self, account: &str, email: &str) -> Result<ExistingUser, DbError>;

    /// Insert a user whose password is already hashed.
    async fn insert_user(
        &self,
        account: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<InsertResult, DbError>;
}

#[async_trait]
impl UserStore for Database {
    async fn check_existing(&self, account: &str, email: &str) -> Result<ExistingUser, DbError> {
        self.users().check_existing(account, email).await
    }

    async fn insert_user(
        &self,
        account: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<InsertResult, DbError> {
        self.users().insert(account, email, password_hash).await
    }
}
