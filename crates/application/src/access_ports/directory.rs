use async_trait::async_trait;
use fieldkit_core::{AppResult, UserIdentity};

use crate::entity_policies::AreaRef;

/// Lookup of user accounts managed by the identity provider.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by login name.
    async fn find_by_username(&self, username: &str) -> AppResult<Option<UserIdentity>>;
}

/// Catalog of operational areas.
#[async_trait]
pub trait AreaDirectory: Send + Sync {
    /// Lists every area with its country.
    async fn list_areas(&self) -> AppResult<Vec<AreaRef>>;
}
