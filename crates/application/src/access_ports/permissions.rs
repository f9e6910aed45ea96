use async_trait::async_trait;
use fieldkit_core::{AppResult, UserId};
use fieldkit_domain::Permission;

/// Repository port for global permission lookups.
#[async_trait]
pub trait AuthorizationRepository: Send + Sync {
    /// Lists effective permissions of a user, through groups included.
    async fn list_permissions_for_user(&self, user_id: UserId) -> AppResult<Vec<Permission>>;
}
