use std::sync::Arc;

use fieldkit_core::{AppResult, UserIdentity};
use fieldkit_domain::{AccessDomain, PermissionSet};
use tracing::debug;

use crate::access_context::AccessContext;
use crate::access_ports::{AuthorizationRepository, UserAccessRepository};


/// Application service resolving the authorization state of a caller.
#[derive(Clone)]
pub struct AuthorizationService {
    repository: Arc<dyn AuthorizationRepository>,
    user_access_repository: Arc<dyn UserAccessRepository>,
}

impl AuthorizationService {
    /// Creates a new authorization service from repository implementations.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthorizationRepository>,
        user_access_repository: Arc<dyn UserAccessRepository>,
    ) -> Self {
        Self {
            repository,
            user_access_repository,
        }
    }

    /// Loads permissions and grants of every domain for the caller. Anonymous
    /// callers resolve to an empty context without touching storage.
    pub async fn resolve_context(&self, user: Option<&UserIdentity>) -> AppResult<AccessContext> {
        let Some(user) = user else {
            return Ok(AccessContext::anonymous());
        };

        let permissions = self
            .repository
            .list_permissions_for_user(user.user_id())
            .await?;

        let mut grants = Vec::new();
        for domain in AccessDomain::all() {
            grants.extend(
                self.user_access_repository
                    .list_grants_for_user(*domain, user.user_id())
                    .await?,
            );
        }

        debug!(
            username = user.username(),
            permissions = permissions.len(),
            grants = grants.len(),
            "resolved access context"
        );

        Ok(AccessContext::authenticated(
            user.user_id(),
            PermissionSet::new(permissions),
            grants,
        ))
    }
}
