use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fieldkit_core::{AppError, AppResult, RecordId, UserId, UserIdentity};
use fieldkit_domain::{
    AccessMode, Asset, AssetState, AssetTransition, CountryId, ModelKind, UserAccessGrant,
};

use super::AccessControlService;
use crate::access_context::PolicyAction;
use crate::access_ports::ScopedRecordRepository;
use crate::access_predicate::AccessPredicate;
use crate::authorization_service::AuthorizationService;
use crate::entity_policies::AssetPolicy;
use crate::test_support::{
    ALL_VERBS, FakeAuthorizationRepository, FakeUserAccessRepository, asset, asset_grant,
    model_permissions,
};

#[derive(Default)]
struct FakeAssetRecords {
    assets: Vec<Asset>,
    queries: AtomicUsize,
}

#[async_trait]
impl ScopedRecordRepository for FakeAssetRecords {
    async fn list_record_ids(
        &self,
        model: ModelKind,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<RecordId>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if model != ModelKind::Asset {
            return Ok(Vec::new());
        }

        Ok(predicate
            .filter(self.assets.iter())
            .into_iter()
            .map(|asset| asset.id)
            .collect())
    }

    async fn record_matches(
        &self,
        model: ModelKind,
        record_id: RecordId,
        predicate: &AccessPredicate,
    ) -> AppResult<bool> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        Ok(model == ModelKind::Asset
            && self
                .assets
                .iter()
                .any(|asset| asset.id == record_id && predicate.matches(asset)))
    }
}

struct Harness {
    service: AccessControlService,
    records: Arc<FakeAssetRecords>,
    user: UserIdentity,
}

fn harness(
    grants: impl FnOnce(UserId) -> Vec<UserAccessGrant>,
    assets: Vec<Asset>,
) -> Harness {
    let user = UserIdentity::new(UserId::new(), "alice", "Alice");
    let authorization_service = AuthorizationService::new(
        Arc::new(FakeAuthorizationRepository::with(
            user.user_id(),
            model_permissions(ModelKind::Asset, ALL_VERBS),
        )),
        Arc::new(FakeUserAccessRepository::with_grants(grants(user.user_id()))),
    );
    let records = Arc::new(FakeAssetRecords {
        assets,
        queries: AtomicUsize::new(0),
    });

    Harness {
        service: AccessControlService::new(authorization_service, records.clone()),
        records,
        user,
    }
}

#[tokio::test]
async fn listing_is_filtered_by_storage() {
    let country = CountryId::new();
    let inside = asset(AssetState::InStock, Some(country), None);
    let outside = asset(AssetState::InStock, Some(CountryId::new()), None);
    let harness = harness(
        |user| vec![asset_grant(user, Some(country), None, AccessMode::Officer)],
        vec![inside.clone(), outside],
    );

    let ids = harness
        .service
        .list_scoped_ids(Some(&harness.user), &AssetPolicy, PolicyAction::Read)
        .await
        .unwrap_or_default();

    assert_eq!(ids, vec![inside.id]);
}

#[tokio::test]
async fn empty_scope_skips_the_storage_query() {
    let harness = harness(
        |_| Vec::new(),
        vec![asset(AssetState::InStock, None, None)],
    );

    let anonymous = harness
        .service
        .list_scoped_ids(None, &AssetPolicy, PolicyAction::Read)
        .await;
    let without_grant = harness
        .service
        .list_scoped_ids(Some(&harness.user), &AssetPolicy, PolicyAction::Read)
        .await;

    assert!(matches!(anonymous, Ok(ref ids) if ids.is_empty()));
    assert!(matches!(without_grant, Ok(ref ids) if ids.is_empty()));
    assert_eq!(harness.records.queries.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rows_outside_read_scope_are_reported_missing() {
    let country = CountryId::new();
    let inside = asset(AssetState::InStock, Some(country), None);
    let outside = asset(AssetState::InStock, Some(CountryId::new()), None);
    let harness = harness(
        |user| vec![asset_grant(user, Some(country), None, AccessMode::Officer)],
        vec![inside.clone(), outside.clone()],
    );
    let require = |record_id, action| {
        harness.service.require_scoped_record(
            Some(&harness.user),
            &AssetPolicy,
            record_id,
            action,
        )
    };

    assert!(matches!(
        require(outside.id, PolicyAction::Read).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        require(RecordId::new(), PolicyAction::Edit).await,
        Err(AppError::NotFound(_))
    ));
    assert!(require(inside.id, PolicyAction::Read).await.is_ok());
    assert!(require(inside.id, PolicyAction::Edit).await.is_ok());
    assert!(matches!(
        require(inside.id, PolicyAction::Delete).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test]
async fn supervisors_delete_stored_rows_in_stock_only() {
    let country = CountryId::new();
    let in_stock = asset(AssetState::InStock, Some(country), None);
    let assigned = asset(AssetState::Assigned, Some(country), None);
    let harness = harness(
        |user| vec![asset_grant(user, Some(country), None, AccessMode::Manager)],
        vec![in_stock.clone(), assigned.clone()],
    );

    let allowed = harness
        .service
        .require_scoped_record(Some(&harness.user), &AssetPolicy, in_stock.id, PolicyAction::Delete)
        .await;
    let denied = harness
        .service
        .require_scoped_record(Some(&harness.user), &AssetPolicy, assigned.id, PolicyAction::Delete)
        .await;

    assert!(allowed.is_ok());
    assert!(matches!(denied, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn loaded_instances_distinguish_missing_from_forbidden() {
    let country = CountryId::new();
    let harness = harness(
        |user| vec![asset_grant(user, Some(country), None, AccessMode::Officer)],
        Vec::new(),
    );
    let inside = asset(AssetState::InStock, Some(country), None);
    let outside = asset(AssetState::InStock, Some(CountryId::new()), None);
    let user = Some(&harness.user);

    let missing = harness
        .service
        .require_mutation(user, &AssetPolicy, &outside, PolicyAction::Edit)
        .await;
    let forbidden = harness
        .service
        .require_mutation(user, &AssetPolicy, &inside, PolicyAction::Delete)
        .await;
    let editable = harness
        .service
        .can_mutate_instance(user, &AssetPolicy, &inside, PolicyAction::Edit)
        .await;

    assert!(matches!(missing, Err(AppError::NotFound(_))));
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));
    assert!(matches!(editable, Ok(true)));
}

#[tokio::test]
async fn transition_hook_uses_the_caller_context() {
    let country = CountryId::new();
    let harness = harness(
        |user| vec![asset_grant(user, Some(country), None, AccessMode::Officer)],
        Vec::new(),
    );
    let inside = asset(AssetState::InStock, Some(country), None);

    let officer = harness
        .service
        .scope_workflow_transition_check(
            Some(&harness.user),
            &AssetPolicy,
            &inside,
            AssetTransition::Assign,
        )
        .await;
    let anonymous = harness
        .service
        .scope_workflow_transition_check(None, &AssetPolicy, &inside, AssetTransition::Assign)
        .await;

    assert!(matches!(officer, Ok(true)));
    assert!(matches!(anonymous, Ok(false)));
}
