use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use fieldkit_application::{AccessPredicate, ScopedRecordRepository};
use fieldkit_core::{AppError, AppResult, RecordId};
use fieldkit_domain::ModelKind;

use crate::predicate_sql::{push_predicate, record_columns};


/// PostgreSQL-backed evaluation of row predicates over entity tables.
#[derive(Clone)]
pub struct PostgresScopedRecordRepository {
    pool: PgPool,
}

impl PostgresScopedRecordRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn scoped_ids_query(
    model: ModelKind,
    predicate: &AccessPredicate,
) -> QueryBuilder<'static, Postgres> {
    let columns = record_columns(model);
    let mut builder = QueryBuilder::new("SELECT record.id FROM ");
    builder.push(columns.table);
    builder.push(" AS record WHERE ");
    push_predicate(&mut builder, &columns, predicate);
    builder.push(" ORDER BY record.id");
    builder
}

fn scoped_exists_query(
    model: ModelKind,
    record_id: RecordId,
    predicate: &AccessPredicate,
) -> QueryBuilder<'static, Postgres> {
    let columns = record_columns(model);
    let mut builder = QueryBuilder::new("SELECT EXISTS (SELECT 1 FROM ");
    builder.push(columns.table);
    builder.push(" AS record WHERE record.id = ");
    builder.push_bind(record_id.as_uuid());
    builder.push(" AND ");
    push_predicate(&mut builder, &columns, predicate);
    builder.push(')');
    builder
}

#[async_trait]
impl ScopedRecordRepository for PostgresScopedRecordRepository {
    async fn list_record_ids(
        &self,
        model: ModelKind,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<RecordId>> {
        let rows = scoped_ids_query(model, predicate)
            .build_query_scalar::<Uuid>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to list scoped '{}' records: {error}",
                    model.as_str()
                ))
            })?;

        Ok(rows.into_iter().map(RecordId::from_uuid).collect())
    }

    async fn record_matches(
        &self,
        model: ModelKind,
        record_id: RecordId,
        predicate: &AccessPredicate,
    ) -> AppResult<bool> {
        scoped_exists_query(model, record_id, predicate)
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to check scoped '{}' record '{record_id}': {error}",
                    model.as_str()
                ))
            })
    }
}
