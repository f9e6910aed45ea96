use sqlx::Transaction;
use tracing::warn;

use super::*;

const NIL_UUID: &str = "'00000000-0000-0000-0000-000000000000'::uuid";

impl PostgresUserAccessRepository {
    pub(super) async fn upsert_grants_impl(
        &self,
        domain: AccessDomain,
        grants: &[UserAccessGrant],
        actor: &str,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let sql = format!(
            "INSERT INTO {} AS record (id, user_id, country_id, area_id, mode) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id, COALESCE(country_id, {NIL_UUID}), \
             COALESCE(area_id, {NIL_UUID})) \
             DO UPDATE SET mode = EXCLUDED.mode \
             RETURNING {GRANT_COLUMNS}",
            grant_columns(domain).table
        );

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start {} access upsert transaction: {error}",
                domain.as_str()
            ))
        })?;

        let mut stored = Vec::with_capacity(grants.len());
        for grant in grants {
            let row = sqlx::query_as::<_, GrantRow>(sql.as_str())
                .bind(grant.id().as_uuid())
                .bind(grant.user_id().as_uuid())
                .bind(grant.country().value().map(|country| country.as_uuid()))
                .bind(grant.area().value().map(|area| area.as_uuid()))
                .bind(grant.mode().as_str())
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| {
                    warn!(
                        domain = domain.as_str(),
                        user_id = %grant.user_id(),
                        %error,
                        "grant upsert failed, rolling back"
                    );
                    AppError::Internal(format!(
                        "failed to upsert {} access for user '{}': {error}",
                        domain.as_str(),
                        grant.user_id()
                    ))
                })?;
            let grant = row.into_grant(domain)?;

            append_audit_event(
                &mut transaction,
                grant_event(domain, AuditAction::UserAccessGranted, &grant, actor),
            )
            .await?;
            stored.push(grant);
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit {} access upsert transaction: {error}",
                domain.as_str()
            ))
        })?;

        Ok(stored)
    }

    pub(super) async fn delete_grants_impl(
        &self,
        domain: AccessDomain,
        grant_ids: &[RecordId],
        actor: &str,
    ) -> AppResult<u64> {
        if grant_ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM {} AS record WHERE record.id = ANY($1) RETURNING {GRANT_COLUMNS}",
            grant_columns(domain).table
        );
        let ids: Vec<Uuid> = grant_ids.iter().map(RecordId::as_uuid).collect();

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start {} access delete transaction: {error}",
                domain.as_str()
            ))
        })?;

        let rows = sqlx::query_as::<_, GrantRow>(sql.as_str())
            .bind(ids)
            .fetch_all(&mut *transaction)
            .await
            .map_err(|error| {
                warn!(domain = domain.as_str(), %error, "grant delete failed, rolling back");
                AppError::Internal(format!(
                    "failed to delete {} accesses: {error}",
                    domain.as_str()
                ))
            })?;
        let deleted = grant_rows(domain, rows)?;

        for grant in &deleted {
            append_audit_event(
                &mut transaction,
                grant_event(domain, AuditAction::UserAccessRevoked, grant, actor),
            )
            .await?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit {} access delete transaction: {error}",
                domain.as_str()
            ))
        })?;

        u64::try_from(deleted.len()).map_err(|error| {
            AppError::Internal(format!("invalid deleted access count: {error}"))
        })
    }
}

async fn append_audit_event(
    transaction: &mut Transaction<'_, Postgres>,
    event: AuditEvent,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_log_entries (
            subject,
            action,
            resource_type,
            resource_id,
            detail
        )
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(event.subject)
    .bind(event.action.as_str())
    .bind(event.resource_type)
    .bind(event.resource_id)
    .bind(event.detail)
    .execute(&mut **transaction)
    .await
    .map_err(|error| AppError::Internal(format!("failed to append audit event: {error}")))?;

    Ok(())
}
