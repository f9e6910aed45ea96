use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use fieldkit_application::{AreaDirectory, AreaRef, UserDirectory};
use fieldkit_core::{AppError, AppResult, UserId, UserIdentity};
use fieldkit_domain::{AreaId, CountryId};

/// PostgreSQL-backed lookup of user accounts and operational areas.
#[derive(Clone)]
pub struct PostgresDirectoryRepository {
    pool: PgPool,
}

impl PostgresDirectoryRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    display_name: String,
}

#[derive(Debug, FromRow)]
struct AreaRow {
    id: Uuid,
    country_id: Uuid,
    is_active: bool,
}

#[async_trait]
impl UserDirectory for PostgresDirectoryRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserIdentity>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, display_name
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find user '{username}': {error}"))
        })?;

        Ok(row.map(|row| {
            UserIdentity::new(UserId::from_uuid(row.id), row.username, row.display_name)
        }))
    }
}

#[async_trait]
impl AreaDirectory for PostgresDirectoryRepository {
    async fn list_areas(&self) -> AppResult<Vec<AreaRef>> {
        let rows = sqlx::query_as::<_, AreaRow>(
            r#"
            SELECT id, country_id, is_active
            FROM areas
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list areas: {error}")))?;

        Ok(rows
            .into_iter()
            .map(|row| AreaRef {
                id: AreaId::from_uuid(row.id),
                country: CountryId::from_uuid(row.country_id),
                is_active: row.is_active,
            })
            .collect())
    }
}
