//! User repository for registration.
//!
//! Handles the uniqueness check and insertion against the `users` table.

use super::DbError;
use sqlx::SqlitePool;

/// A stored user row.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub account: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub registered_at: i64,
}

/// Which of the requested fields are already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExistingUser {
    pub account_exists: bool,
    pub email_exists: bool,
}

impl ExistingUser {
    /// Neither field is taken.
    pub fn is_clear(&self) -> bool {
        !self.account_exists && !self.email_exists
    }
}

/// Result of an INSERT into `users`.
#[derive(Debug, Clone, Copy)]
pub struct InsertResult {
    pub rows_affected: u64,
    pub id: i64,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Check whether `account` or `email` is already registered.
    ///
    /// Both lookups run in one statement. Matching is exact and case-sensitive.
    pub async fn check_existing(&self, account: &str, email: &str) -> Result<ExistingUser, DbError> {
        let (account_exists, email_exists) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                EXISTS(SELECT 1 FROM users WHERE account = ?) AS account_exists,
                EXISTS(SELECT 1 FROM users WHERE email = ?) AS email_exists
            "#,
        )
        .bind(account)
        .bind(email)
        .fetch_one(self.pool)
        .await?;

        Ok(ExistingUser {
            account_exists: account_exists != 0,
            email_exists: email_exists != 0,
        })
    }

    /// Insert a new user with an already-hashed password.
    pub async fn insert(
        &self,
        account: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<InsertResult, DbError> {
        let now = chrono::Utc::now().timestamp();

        // UNIQUE constraints catch registrations that raced past the check
        let result = sqlx::query(
            r#"
            INSERT INTO users (account, email, password, registered_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(account)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return DbError::UniqueViolation(db_err.message().to_string());
            }
            DbError::from(e)
        })?;

        Ok(InsertResult {
            rows_affected: result.rows_affected(),
            id: result.last_insert_rowid(),
        })
    }

    /// Find user by account name.
    pub async fn find_by_account(&self, account: &str) -> Result<Option<UserRecord>, DbError> {
        let row = sqlx::query_as::<_, (i64, String, String, String, i64)>(
            r#"
            SELECT id, account, email, password, registered_at
            FROM users
            WHERE account = ?
            "#,
        )
        .bind(account)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(|(id, account, email, password, registered_at)| UserRecord {
            id,
            account,
            email,
            password,
            registered_at,
        }))
    }
}
