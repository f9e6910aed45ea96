use async_trait::async_trait;
use fieldkit_core::{AppResult, RecordId, UserId};
use fieldkit_domain::{AccessDomain, UserAccessGrant};

use crate::access_predicate::AccessPredicate;

/// Repository port for grant tables.
#[async_trait]
pub trait UserAccessRepository: Send + Sync {
    /// Lists the grants held by one user in a domain.
    async fn list_grants_for_user(
        &self,
        domain: AccessDomain,
        user_id: UserId,
    ) -> AppResult<Vec<UserAccessGrant>>;

    /// Lists the grants of a domain matching a grant-row predicate.
    async fn list_grants(
        &self,
        domain: AccessDomain,
        predicate: &AccessPredicate,
    ) -> AppResult<Vec<UserAccessGrant>>;

    /// Finds one grant.
    async fn find_grant(
        &self,
        domain: AccessDomain,
        grant_id: RecordId,
    ) -> AppResult<Option<UserAccessGrant>>;

    /// Upserts grants on their natural key `(user, country, area)`, replacing
    /// the mode of existing rows, and records one audit event per grant, all in
    /// one transaction. Returns the stored grants.
    async fn upsert_grants(
        &self,
        domain: AccessDomain,
        grants: &[UserAccessGrant],
        actor: &str,
    ) -> AppResult<Vec<UserAccessGrant>>;

    /// Deletes grants and records one audit event per deleted grant, in one
    /// transaction. Returns the number of deleted rows.
    async fn delete_grants(
        &self,
        domain: AccessDomain,
        grant_ids: &[RecordId],
        actor: &str,
    ) -> AppResult<u64>;
}
