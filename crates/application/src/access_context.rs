use fieldkit_core::UserId;
use fieldkit_domain::{
    AccessDomain, Geography, ModelKind, Permission, PermissionSet, PermissionVerb,
    UserAccessGrant,
};
use serde::{Deserialize, Serialize};

/// Kind of row access being scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyAction {
    /// List and retrieve.
    Read,
    /// Update.
    Edit,
    /// Delete.
    Delete,
    /// Play a workflow transition.
    PlayTransition,
}

impl PolicyAction {
    /// Model permission verb gating this action, if any.
    #[must_use]
    pub fn verb(&self) -> Option<PermissionVerb> {
        match self {
            Self::Read => Some(PermissionVerb::View),
            Self::Edit => Some(PermissionVerb::Change),
            Self::Delete => Some(PermissionVerb::Delete),
            Self::PlayTransition => None,
        }
    }

    /// Edit or delete.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Edit | Self::Delete)
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::PlayTransition => "play_transition",
        }
    }
}

/// Everything known about the caller while authorizing one request.
///
/// Resolved once per request, after which every policy decision is a pure
/// function of this value. Anonymous contexts hold no permission and no grant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessContext {
    user_id: Option<UserId>,
    permissions: PermissionSet,
    grants: Vec<UserAccessGrant>,
}

impl AccessContext {
    /// Context of an unauthenticated caller.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context of an authenticated caller.
    #[must_use]
    pub fn authenticated(
        user_id: UserId,
        permissions: PermissionSet,
        grants: Vec<UserAccessGrant>,
    ) -> Self {
        let grants = grants
            .into_iter()
            .filter(|grant| grant.user_id() == user_id)
            .collect();

        Self {
            user_id: Some(user_id),
            permissions,
            grants,
        }
    }

    /// Returns the caller, if authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Returns whether the caller is authenticated.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Returns whether the caller holds a global permission.
    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        self.is_authenticated() && self.permissions.has(permission)
    }

    /// Returns whether the caller holds any of the permissions.
    #[must_use]
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        self.is_authenticated() && self.permissions.has_any(permissions)
    }

    /// Narrow or blanket `verb` permission on `model`.
    #[must_use]
    pub fn allows(&self, verb: PermissionVerb, model: ModelKind) -> bool {
        self.is_authenticated() && self.permissions.allows(verb, model)
    }

    /// Blanket `verb` permission on `model`.
    #[must_use]
    pub fn allows_all(&self, verb: PermissionVerb, model: ModelKind) -> bool {
        self.is_authenticated() && self.permissions.allows_all(verb, model)
    }

    /// Caller grants in one domain.
    pub fn grants(&self, domain: AccessDomain) -> impl Iterator<Item = &UserAccessGrant> {
        self.grants
            .iter()
            .filter(move |grant| grant.domain() == domain)
    }

    /// Caller grants in one domain whose scope contains `geography`.
    pub fn grants_applying_to(
        &self,
        domain: AccessDomain,
        geography: Geography,
    ) -> impl Iterator<Item = &UserAccessGrant> {
        self.grants(domain)
            .filter(move |grant| grant.applies_to(geography))
    }
}
