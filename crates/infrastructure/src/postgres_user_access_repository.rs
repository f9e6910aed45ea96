use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use fieldkit_application::{AccessPredicate, AuditEvent, UserAccessRepository};
use fieldkit_core::{AppError, AppResult, RecordId, UserId};
use fieldkit_domain::{
    AccessDomain, AccessMode, AreaId, AuditAction, CountryId, ModelKind, Scope, UserAccessGrant,
};

use crate::predicate_sql::{grant_columns, push_predicate};

mod write;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed repository for the three grant tables.
#[derive(Clone)]
pub struct PostgresUserAccessRepository {
    pool: PgPool,
}

impl PostgresUserAccessRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const GRANT_COLUMNS: &str =
    "record.id, record.user_id, record.country_id, record.area_id, record.mode";

#[derive(Debug, FromRow)]
struct GrantRow {
    id: Uuid,
    user_id: Uuid,
    country_id: Option<Uuid>,
    area_id: Option<Uuid>,
    mode: String,
}

impl GrantRow {
    fn into_grant(self, domain: AccessDomain) -> AppResult<UserAccessGrant> {
        let mode = AccessMode::from_str(self.mode.as_str()).map_err(|error| {
            AppError::Internal(format!(
                "failed to decode mode '{}' of {} access '{}': {error}",
                self.mode,
                domain.as_str(),
                self.id
            ))
        })?;

        Ok(UserAccessGrant::new(
            RecordId::from_uuid(self.id),
            domain,
            UserId::from_uuid(self.user_id),
            Scope::from_option(self.country_id.map(CountryId::from_uuid)),
            Scope::from_option(self.area_id.map(AreaId::from_uuid)),
            mode,
        ))
    }
}

fn grant_rows(domain: AccessDomain, rows: Vec<GrantRow>) -> AppResult<Vec<UserAccessGrant>> {
    rows.into_iter().map(|row| row.into_grant(domain)).collect()
}

fn grant_event(
    domain: AccessDomain,
    action: AuditAction,
    grant: &UserAccessGrant,
    actor: &str,
) -> AuditEvent {
    AuditEvent {
        subject: actor.to_owned(),
        action,
        resource_type: ModelKind::user_access_of(domain).as_str().to_owned(),
        resource_id: grant.id().to_string(),
        detail: Some(format!(
            "user '{}' mode '{}'",
            grant.user_id(),
            grant.mode().as_str()
        )),
    }
}

fn scoped_grants_query(
    domain: AccessDomain,
    predicate: &AccessPredicate,
) -> QueryBuilder<'static, Postgres> {
    let columns = grant_columns(domain);
    let mut builder = QueryBuilder::new("SELECT ");
    builder.push(GRANT_COLUMNS);
    builder.push(" FROM ");
    builder.push(columns.table);
    builder.push(" AS record WHERE ");
    push_predicate(&mut builder, &columns, predicate);
    builder.push(" ORDER BY record.created_at, record.id");
    builder
}

#[async_trait]
impl UserAccessRepository for PostgresUserAccessRepository {
    async fn list_grants_for_user(
        &self,
        domain: AccessDomain,
        user_id: UserId,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let sql = format!(
            "SELECT {GRANT_COLUMNS} FROM {} AS record WHERE record.user_id = $1 \
             ORDER BY record.created_at, record.id",
            grant_columns(domain).table
        );
        let rows = sqlx::query_as::<_, GrantRow>(sql.as_str())
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to load {} accesses of user '{user_id}': {error}",
                    domain.as_str()
                ))
            })?;

        grant_rows(domain, rows)
    }

    async fn list_grants(
        &self,
        domain: AccessDomain,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let rows = scoped_grants_query(domain, predicate)
            .build_query_as::<GrantRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list {} accesses: {error}",
                    domain.as_str()
                ))
            })?;

        grant_rows(domain, rows)
    }

    async fn find_grant(
        &self,
        domain: AccessDomain,
        grant_id: RecordId,
    ) -> AppResult<Option<UserAccessGrant>> {
        let sql = format!(
            "SELECT {GRANT_COLUMNS} FROM {} AS record WHERE record.id = $1",
            grant_columns(domain).table
        );
        let row = sqlx::query_as::<_, GrantRow>(sql.as_str())
            .bind(grant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to find {} access '{grant_id}': {error}",
                    domain.as_str()
                ))
            })?;

        row.map(|row| row.into_grant(domain)).transpose()
    }

    async fn upsert_grants(
        &self,
        domain: AccessDomain,
        grants: &[UserAccessGrant],
        actor: &str,
    ) -> AppResult<Vec<UserAccessGrant>> {
        self.upsert_grants_impl(domain, grants, actor).await
    }

    async fn delete_grants(
        &self,
        domain: AccessDomain,
        grant_ids: &[RecordId],
        actor: &str,
    ) -> AppResult<u64> {
        self.delete_grants_impl(domain, grant_ids, actor).await
    }
}
