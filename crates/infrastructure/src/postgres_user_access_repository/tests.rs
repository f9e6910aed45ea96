use fieldkit_application::{AccessPredicate, RowCondition, UserAccessRepository};
use fieldkit_core::{RecordId, UserId};
use fieldkit_domain::{AccessDomain, AccessMode, Scope, UserAccessGrant};
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

use super::{PostgresUserAccessRepository, scoped_grants_query};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres user access tests: {error}");
    }

    Some(pool)
}

async fn ensure_user(pool: &PgPool, user_id: UserId) {
    let insert = sqlx::query(
        r#"
            INSERT INTO users (id, username, display_name)
            VALUES ($1, $2, $2)
            ON CONFLICT (id) DO NOTHING
            "#,
    )
    .bind(user_id.as_uuid())
    .bind(format!("user-{user_id}"))
    .execute(pool)
    .await;

    assert!(insert.is_ok());
}

async fn audit_count(pool: &PgPool, resource_id: RecordId) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM audit_log_entries WHERE resource_id = $1",
    )
    .bind(resource_id.to_string())
    .fetch_one(pool)
    .await
    .unwrap_or_default()
}

fn unscoped(user_id: UserId, mode: AccessMode) -> UserAccessGrant {
    UserAccessGrant::new(
        RecordId::new(),
        AccessDomain::Supplier,
        user_id,
        Scope::Any,
        Scope::Any,
        mode,
    )
}

#[test]
fn listing_renders_the_grant_predicate() {
    let builder = scoped_grants_query(
        AccessDomain::Procurement,
        &AccessPredicate::Condition(RowCondition::HasPrimaryKey),
    );

    assert_eq!(
        builder.sql(),
        "SELECT record.id, record.user_id, record.country_id, record.area_id, record.mode \
         FROM procurement_user_accesses AS record WHERE record.id IS NOT NULL \
         ORDER BY record.created_at, record.id"
    );
}

#[tokio::test]
async fn upsert_replaces_the_mode_on_the_natural_key() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserAccessRepository::new(pool.clone());
    let user_id = UserId::new();
    ensure_user(&pool, user_id).await;

    let first = repository
        .upsert_grants(
            AccessDomain::Supplier,
            &[unscoped(user_id, AccessMode::Officer)],
            "alice",
        )
        .await
        .unwrap_or_default();
    let second = repository
        .upsert_grants(
            AccessDomain::Supplier,
            &[unscoped(user_id, AccessMode::Manager)],
            "alice",
        )
        .await
        .unwrap_or_default();

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert_eq!(first[0].id(), second[0].id());
    assert_eq!(second[0].mode(), AccessMode::Manager);

    let stored = repository
        .list_grants_for_user(AccessDomain::Supplier, user_id)
        .await
        .unwrap_or_default();
    assert_eq!(stored, second);
    assert_eq!(audit_count(&pool, second[0].id()).await, 2);
}

#[tokio::test]
async fn delete_reports_rows_actually_removed() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let repository = PostgresUserAccessRepository::new(pool.clone());
    let user_id = UserId::new();
    ensure_user(&pool, user_id).await;

    let stored = repository
        .upsert_grants(
            AccessDomain::Supplier,
            &[unscoped(user_id, AccessMode::Officer)],
            "alice",
        )
        .await
        .unwrap_or_default();
    let Some(grant) = stored.first() else {
        panic!("upsert returned no grant");
    };

    let deleted = repository
        .delete_grants(
            AccessDomain::Supplier,
            &[grant.id(), RecordId::new()],
            "alice",
        )
        .await;
    assert!(matches!(deleted, Ok(1)));

    let found = repository
        .find_grant(AccessDomain::Supplier, grant.id())
        .await;
    assert!(matches!(found, Ok(None)));
    assert_eq!(audit_count(&pool, grant.id()).await, 2);
}
