//! PostgreSQL user store
//!
//! Relationship arrays live in `UUID[]` columns on the `users` table. An
//! update locks the row with `SELECT ... FOR UPDATE`, applies the patch, and
//! writes the three columns back inside one transaction.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, UserPatch, UserStore};
use crate::backend::auth::users::{NewUser, User};

const USER_COLUMNS: &str = "id, name, email, password_hash, image, friend_requests, \
     sent_friend_requests, friends, created_at, updated_at";

/// User store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate { field: "email" }
        }
        _ => StoreError::Database(err),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = User::new(new_user);

        let query = format!(
            r#"
            INSERT INTO users (id, name, email, password_hash, image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&query)
            .bind(user.id)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.image)
            .bind(user.created_at)
            .bind(user.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_insert_error)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)");
        let users = sqlx::query_as::<_, User>(&query)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn list_except(&self, id: Uuid) -> Result<Vec<User>, StoreError> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id <> $1 ORDER BY created_at ASC, id ASC"
        );
        let users = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let mut user = sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::Missing(id))?;

        patch.apply_to(&mut user);

        sqlx::query(
            r#"
            UPDATE users
            SET friend_requests = $1, sent_friend_requests = $2, friends = $3, updated_at = $4
            WHERE id = $5
            "#,
        )
        .bind(&user.friend_requests)
        .bind(&user.sent_friend_requests)
        .bind(&user.friends)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}
