use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::StoreError;
use crate::users::repo_types::{NewUser, User, UserFields, UserPage};

/// Persistence for user accounts. Every query ignores soft-deleted rows.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    /// `user.pass_word` must already be a digest.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
    /// Writes name, role and digest back and bumps `updated_at`.
    async fn save(&self, user: &User) -> Result<(), StoreError>;
    async fn list(
        &self,
        filter: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage, StoreError>;
    /// Touches only `user_name` and `role`.
    async fn edit_fields(&self, id: i64, fields: &UserFields) -> Result<(), StoreError>;
    async fn soft_delete(&self, id: i64) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str = "id, created_at, updated_at, deleted_at, user_name, pass_word, role";

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
    async fn find_by_username(&self, user_name: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_name = $1 AND deleted_at IS NULL LIMIT 1"
        ))
        .bind(user_name)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (user_name, pass_word, role)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.user_name)
        .bind(&user.pass_word)
        .bind(user.role)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
               SET user_name = $2, pass_word = $3, role = $4, updated_at = now()
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(user.id)
        .bind(&user.user_name)
        .bind(&user.pass_word)
        .bind(user.role)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn list(
        &self,
        filter: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<UserPage, StoreError> {
        let pattern = filter.map(|f| format!("%{f}%"));

        let items = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
              FROM users
             WHERE deleted_at IS NULL
               AND ($1::text IS NULL OR user_name LIKE $1)
             ORDER BY id
             LIMIT $2 OFFSET $3
            "#
        ))
        .bind(pattern.as_deref())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
              FROM users
             WHERE deleted_at IS NULL
               AND ($1::text IS NULL OR user_name LIKE $1)
            "#,
        )
        .bind(pattern.as_deref())
        .fetch_one(&self.db)
        .await?;

        Ok(UserPage { items, total })
    }

    async fn edit_fields(&self, id: i64, fields: &UserFields) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
               SET user_name = $2, role = $3
             WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(&fields.user_name)
        .bind(fields.role)
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE users SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(())
    }
}
