use std::sync::Arc;

use axum::response::Response;
use fieldkit_application::{
    AccessControlService, AuthorizationService, UserAccessRepository, UserAccessService,
};
use fieldkit_core::{RecordId, UserId, UserIdentity};
use fieldkit_domain::{
    AccessDomain, AccessMode, CountryId, ModelKind, Permission, PermissionVerb, Scope,
    UserAccessGrant,
};
use fieldkit_infrastructure::{InMemoryAccessRepository, InMemoryScopedRecordRepository};

use crate::state::AppState;

pub(crate) const AUTH_USER_HEADER: &str = "x-authenticated-user";

const VERBS: [PermissionVerb; 4] = [
    PermissionVerb::View,
    PermissionVerb::Add,
    PermissionVerb::Change,
    PermissionVerb::Delete,
];

pub(crate) struct TestApp {
    pub state: AppState,
    pub access: Arc<InMemoryAccessRepository>,
    pub records: Arc<InMemoryScopedRecordRepository>,
    pub alice: UserIdentity,
    pub bob: UserIdentity,
}

/// Alice administers asset grants and reads assets through her grants. Bob
/// holds nothing.
pub(crate) async fn test_app() -> TestApp {
    let access = Arc::new(InMemoryAccessRepository::new());
    let records = Arc::new(InMemoryScopedRecordRepository::new());
    let alice = UserIdentity::new(UserId::new(), "alice", "Alice");
    let bob = UserIdentity::new(UserId::new(), "bob", "Bob");
    access.add_user(alice.clone()).await;
    access.add_user(bob.clone()).await;

    let grant_model = ModelKind::user_access_of(AccessDomain::Asset);
    let permissions: Vec<Permission> = VERBS
        .iter()
        .flat_map(|verb| {
            [
                Permission::Model(*verb, grant_model),
                Permission::ModelAll(*verb, grant_model),
                Permission::Model(*verb, ModelKind::Asset),
            ]
        })
        .collect();
    access.set_permissions(alice.user_id(), permissions).await;

    let authorization_service = AuthorizationService::new(access.clone(), access.clone());
    let state = AppState {
        user_access_service: UserAccessService::new(
            authorization_service.clone(),
            access.clone(),
            access.clone(),
            access.clone(),
        ),
        access_control_service: AccessControlService::new(authorization_service, records.clone()),
        user_directory: access.clone(),
        auth_user_header: AUTH_USER_HEADER.to_owned(),
    };

    TestApp {
        state,
        access,
        records,
        alice,
        bob,
    }
}

/// Stores an asset grant for `user_id` and returns it.
pub(crate) async fn seed_asset_grant(
    access: &InMemoryAccessRepository,
    user_id: UserId,
    country: Option<CountryId>,
    mode: AccessMode,
) -> Option<UserAccessGrant> {
    let grant = UserAccessGrant::new(
        RecordId::new(),
        AccessDomain::Asset,
        user_id,
        Scope::from_option(country),
        Scope::Any,
        mode,
    );

    access
        .upsert_grants(AccessDomain::Asset, &[grant], "seed")
        .await
        .unwrap_or_default()
        .pop()
}

pub(crate) async fn json_body(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();
    serde_json::from_slice(&bytes).unwrap_or_default()
}
