use std::collections::HashMap;

use async_trait::async_trait;
use fieldkit_core::{AppResult, RecordId, UserId, UserIdentity};
use fieldkit_domain::{
    AccessDomain, AccessMode, AreaId, Asset, AssetState, AuditAction, CountryId, ModelKind,
    Permission, PermissionSet, PermissionVerb, Place, Premises, Scope, UserAccessGrant,
};
use tokio::sync::Mutex;

use crate::access_context::AccessContext;
use crate::access_ports::{
    AreaDirectory, AuditEvent, AuthorizationRepository, UserAccessRepository, UserDirectory,
};
use crate::access_predicate::AccessPredicate;
use crate::entity_policies::AreaRef;

pub(crate) fn grant(
    user_id: UserId,
    domain: AccessDomain,
    country: Scope<CountryId>,
    area: Scope<AreaId>,
    mode: AccessMode,
) -> UserAccessGrant {
    UserAccessGrant::new(RecordId::new(), domain, user_id, country, area, mode)
}

pub(crate) fn asset_grant(
    user_id: UserId,
    country: Option<CountryId>,
    area: Option<AreaId>,
    mode: AccessMode,
) -> UserAccessGrant {
    grant(
        user_id,
        AccessDomain::Asset,
        Scope::from_option(country),
        Scope::from_option(area),
        mode,
    )
}

pub(crate) fn model_permissions(model: ModelKind, verbs: &[PermissionVerb]) -> Vec<Permission> {
    verbs
        .iter()
        .map(|verb| Permission::Model(*verb, model))
        .collect()
}

pub(crate) const ALL_VERBS: &[PermissionVerb] = &[
    PermissionVerb::View,
    PermissionVerb::Add,
    PermissionVerb::Change,
    PermissionVerb::Delete,
];

pub(crate) fn context(
    user_id: UserId,
    permissions: Vec<Permission>,
    grants: Vec<UserAccessGrant>,
) -> AccessContext {
    AccessContext::authenticated(user_id, PermissionSet::new(permissions), grants)
}

pub(crate) fn premises(country: Option<CountryId>, area: Option<AreaId>) -> Premises {
    Premises {
        mission_country: country,
        place: Some(Place { acted_area: area }),
    }
}

pub(crate) fn asset(
    state: AssetState,
    country: Option<CountryId>,
    area: Option<AreaId>,
) -> Asset {
    Asset {
        id: RecordId::new(),
        state,
        country_mission: country,
        current_premises: Some(premises(country, area)),
        purchase_number: None,
        created_by: None,
    }
}

#[derive(Default)]
pub(crate) struct FakeUserAccessRepository {
    pub(crate) grants: Mutex<Vec<UserAccessGrant>>,
    pub(crate) events: Mutex<Vec<AuditEvent>>,
}

impl FakeUserAccessRepository {
    pub(crate) fn with_grants(grants: Vec<UserAccessGrant>) -> Self {
        Self {
            grants: Mutex::new(grants),
            events: Mutex::new(Vec::new()),
        }
    }

    fn event(
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
            detail: Some(grant.mode().as_str().to_owned()),
        }
    }
}

#[async_trait]
impl UserAccessRepository for FakeUserAccessRepository {
    async fn list_grants_for_user(
        &self,
        domain: AccessDomain,
        user_id: UserId,
    ) -> AppResult<Vec<UserAccessGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| grant.domain() == domain && grant.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn list_grants(
        &self,
        domain: AccessDomain,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<UserAccessGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .filter(|grant| grant.domain() == domain && predicate.matches(*grant))
            .cloned()
            .collect())
    }

    async fn find_grant(
        &self,
        domain: AccessDomain,
        grant_id: RecordId,
    ) -> AppResult<Option<UserAccessGrant>> {
        Ok(self
            .grants
            .lock()
            .await
            .iter()
            .find(|grant| grant.domain() == domain && grant.id() == grant_id)
            .cloned())
    }

    async fn upsert_grants(
        &self,
        domain: AccessDomain,
        grants: &[UserAccessGrant],
        actor: &str,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let mut stored_grants = self.grants.lock().await;
        let mut events = self.events.lock().await;
        let mut stored = Vec::with_capacity(grants.len());

        for grant in grants {
            let existing = stored_grants.iter_mut().find(|candidate| {
                candidate.domain() == domain && candidate.natural_key() == grant.natural_key()
            });
            let grant = match existing {
                Some(existing) => {
                    existing.set_mode(grant.mode());
                    existing.clone()
                }
                None => {
                    stored_grants.push(grant.clone());
                    grant.clone()
                }
            };
            events.push(Self::event(
                domain,
                AuditAction::UserAccessGranted,
                &grant,
                actor,
            ));
            stored.push(grant);
        }

        Ok(stored)
    }

    async fn delete_grants(
        &self,
        domain: AccessDomain,
        grant_ids: &[RecordId],
        actor: &str,
    ) -> AppResult<u64> {
        let mut stored_grants = self.grants.lock().await;
        let mut events = self.events.lock().await;
        let mut deleted = 0;

        stored_grants.retain(|grant| {
            let matched = grant.domain() == domain && grant_ids.contains(&grant.id());
            if matched {
                events.push(Self::event(
                    domain,
                    AuditAction::UserAccessRevoked,
                    grant,
                    actor,
                ));
                deleted += 1;
            }
            !matched
        });

        Ok(deleted)
    }
}

#[derive(Default)]
pub(crate) struct FakeAuthorizationRepository {
    pub(crate) permissions: HashMap<UserId, Vec<Permission>>,
}

impl FakeAuthorizationRepository {
    pub(crate) fn with(user_id: UserId, permissions: Vec<Permission>) -> Self {
        Self {
            permissions: HashMap::from([(user_id, permissions)]),
        }
    }
}

#[async_trait]
impl AuthorizationRepository for FakeAuthorizationRepository {
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        Ok(self.permissions.get(&user_id).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserDirectory {
    pub(crate) users: Vec<UserIdentity>,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserIdentity>> {
        Ok(self
            .users
            .iter()
            .find(|user| user.username() == username)
            .cloned())
    }
}

#[derive(Default)]
pub(crate) struct FakeAreaDirectory {
    pub(crate) areas: Vec<AreaRef>,
}

#[async_trait]
impl AreaDirectory for FakeAreaDirectory {
    async fn list_areas(&self) -> AppResult<Vec<AreaRef>> {
        Ok(self.areas.clone())
    }
}
