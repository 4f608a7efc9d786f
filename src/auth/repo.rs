use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use crate::auth::{
    error::{AuthError, AuthResult},
    repo_types::{NewUser, User},
};

/// Persistence seam for user records.
///
/// Implementations must reject a second row with the same email by
/// returning [`AuthError::DuplicateEmail`]; callers treat their own
/// lookup beforehand as a shortcut only.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>>;

    async fn insert(&self, new_user: NewUser<'_>) -> AuthResult<User>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, new_user: NewUser<'_>) -> AuthResult<User> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
            "#,
        )
        .bind(new_user.name)
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                warn!(email = %new_user.email, "insert hit users_email_key");
                Err(AuthError::DuplicateEmail {
                    email: new_user.email.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use time::OffsetDateTime;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    /// In-process store with the same uniqueness rule as the `users` table.
    #[derive(Default)]
    pub struct MemoryUserStore {
        rows: Mutex<Vec<User>>,
    }

    impl MemoryUserStore {
        pub async fn len(&self) -> usize {
            self.rows.lock().await.len()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> AuthResult<Option<User>> {
            let rows = self.rows.lock().await;
            Ok(rows.iter().find(|u| u.email == email).cloned())
        }

        async fn insert(&self, new_user: NewUser<'_>) -> AuthResult<User> {
            let mut rows = self.rows.lock().await;
            if rows.iter().any(|u| u.email == new_user.email) {
                return Err(AuthError::DuplicateEmail {
                    email: new_user.email.to_string(),
                });
            }
            let now = OffsetDateTime::now_utc();
            let user = User {
                id: Uuid::new_v4(),
                name: new_user.name.to_string(),
                email: new_user.email.to_string(),
                password_hash: new_user.password_hash.to_string(),
                role: new_user.role,
                created_at: now,
                updated_at: now,
            };
            rows.push(user.clone());
            Ok(user)
        }
    }
}
