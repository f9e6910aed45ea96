use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fieldkit_application::{
    AccessPredicate, AreaDirectory, AreaRef, AuditEvent, AuthorizationRepository,
    UserAccessRepository, UserDirectory,
};
use fieldkit_core::{AppResult, RecordId, UserId, UserIdentity};
use fieldkit_domain::{AccessDomain, AuditAction, ModelKind, Permission, UserAccessGrant};


/// In-memory implementation of the permission, grant and directory ports.
#[derive(Debug, Default)]
pub struct InMemoryAccessRepository {
    users: RwLock<HashMap<String, UserIdentity>>,
    permissions: RwLock<HashMap<UserId, Vec<Permission>>>,
    grants: RwLock<Vec<UserAccessGrant>>,
    areas: RwLock<Vec<AreaRef>>,
    audit_events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryAccessRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user account.
    pub async fn add_user(&self, user: UserIdentity) {
        self.users
            .write()
            .await
            .insert(user.username().to_owned(), user);
    }

    /// Replaces the model permissions held by a user.
    pub async fn set_permissions(&self, user_id: UserId, permissions: Vec<Permission>) {
        self.permissions.write().await.insert(user_id, permissions);
    }

    /// Registers an operational area.
    pub async fn add_area(&self, area: AreaRef) {
        self.areas.write().await.push(area);
    }

    /// Audit events recorded so far, oldest first.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
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
            detail: Some(format!(
                "user '{}' mode '{}'",
                grant.user_id(),
                grant.mode().as_str()
            )),
        }
    }
}

#[async_trait]
impl AuthorizationRepository for InMemoryAccessRepository {
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>> {
        Ok(self
            .permissions
            .read()
            .await
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl UserAccessRepository for InMemoryAccessRepository {
    async fn list_grants_for_user(
        &self,
        domain: AccessDomain,
        user_id: UserId,
    ) -> AppResult<Vec<UserAccessGrant>> {
        Ok(self
            .grants
            .read()
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
            .read()
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
            .read()
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
        let mut stored_grants = self.grants.write().await;
        let mut audit_events = self.audit_events.write().await;
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

            audit_events.push(Self::event(
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
        let mut stored_grants = self.grants.write().await;
        let mut audit_events = self.audit_events.write().await;

        let (deleted, kept): (Vec<UserAccessGrant>, Vec<UserAccessGrant>) = stored_grants
            .drain(..)
            .partition(|grant| grant.domain() == domain && grant_ids.contains(&grant.id()));
        *stored_grants = kept;

        audit_events.extend(
            deleted
                .iter()
                .map(|grant| Self::event(domain, AuditAction::UserAccessRevoked, grant, actor)),
        );

        Ok(deleted.len() as u64)
    }
}

#[async_trait]
impl UserDirectory for InMemoryAccessRepository {
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserIdentity>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}

#[async_trait]
impl AreaDirectory for InMemoryAccessRepository {
    async fn list_areas(&self) -> AppResult<Vec<AreaRef>> {
        Ok(self.areas.read().await.clone())
    }
}
