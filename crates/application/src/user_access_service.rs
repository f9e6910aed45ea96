//! Grant administration: listing, batch creation and deletion of grants, and
//! the areas an actor may hand out grants for.

mod batch;


use std::sync::Arc;

use fieldkit_core::{AppError, AppResult, NonEmptyString, RecordId, UserIdentity};
use fieldkit_domain::{AccessDomain, AccessMode, AreaId, CountryId, Scope, UserAccessGrant};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::access_context::{AccessContext, PolicyAction};
use crate::access_ports::{AreaDirectory, UserAccessRepository, UserDirectory};
use crate::authorization_service::AuthorizationService;
use crate::entity_policies::{
    AreaRef, EntityAccessPolicy, GrantRequest, UserAccessPolicy, accessible_areas,
};
use crate::policy_statements::{
    ActionTarget, ApiAction, PolicyStatements, user_access_statements,
};

/// Input payload for creating grants of one user in one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateGrantsInput {
    /// Login name of the grantee.
    pub username: String,
    /// Requested mode, as its storage value.
    pub mode: String,
    /// Target country, `None` for every country.
    pub country: Option<CountryId>,
    /// Target areas. An empty list creates one grant without area.
    #[serde(default)]
    pub areas: Vec<AreaId>,
}

/// Application service for grant administration.
#[derive(Clone)]
pub struct UserAccessService {
    authorization_service: AuthorizationService,
    repository: Arc<dyn UserAccessRepository>,
    user_directory: Arc<dyn UserDirectory>,
    area_directory: Arc<dyn AreaDirectory>,
}

impl UserAccessService {
    /// Creates a new grant service from required dependencies.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        repository: Arc<dyn UserAccessRepository>,
        user_directory: Arc<dyn UserDirectory>,
        area_directory: Arc<dyn AreaDirectory>,
    ) -> Self {
        Self {
            authorization_service,
            repository,
            user_directory,
            area_directory,
        }
    }

    async fn context(&self, actor: &UserIdentity) -> AppResult<AccessContext> {
        self.authorization_service.resolve_context(Some(actor)).await
    }

    /// Lists the grants of a domain visible to the actor.
    pub async fn list_grants(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let context = self.context(actor).await?;
        user_access_statements(domain).authorize(
            &context,
            ApiAction::List,
            ActionTarget::Collection,
        )?;

        let predicate = UserAccessPolicy::new(domain).scope_queryset(&context);
        if predicate.is_nothing() {
            return Ok(Vec::new());
        }

        self.repository.list_grants(domain, &predicate).await
    }

    /// Creates or updates one grant.
    pub async fn create_grant(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
        username: &str,
        country: Option<CountryId>,
        area: Option<AreaId>,
        mode: AccessMode,
    ) -> AppResult<UserAccessGrant> {
        let context = self.context(actor).await?;
        domain.ensure_mode_supported(mode)?;
        let grantee = self.resolve_grantee(username).await?;
        let area = if domain.has_area_axis() { area } else { None };
        let request = GrantRequest {
            country,
            area,
            mode,
        };

        let statements = user_access_statements(domain);
        statements.authorize(&context, ApiAction::Create, ActionTarget::Creation(&request))?;
        let held = self
            .repository
            .list_grants_for_user(domain, grantee.user_id())
            .await?;
        authorize_replacement(&statements, &context, &held, &request)?;

        let grant = UserAccessGrant::new(
            RecordId::new(),
            domain,
            grantee.user_id(),
            Scope::from_option(country),
            Scope::from_option(area),
            mode,
        );
        let mut stored = self
            .repository
            .upsert_grants(domain, &[grant], actor.username())
            .await?;

        info!(
            actor = actor.username(),
            grantee = grantee.username(),
            domain = domain.as_str(),
            mode = mode.as_str(),
            "granted access"
        );

        stored
            .pop()
            .ok_or_else(|| AppError::Internal("grant upsert returned no row".to_owned()))
    }

    /// Deletes one grant. Grants the actor can neither read nor delete are
    /// reported as missing.
    pub async fn delete_grant(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
        grant_id: RecordId,
    ) -> AppResult<bool> {
        let context = self.context(actor).await?;
        let policy = UserAccessPolicy::new(domain);

        let grant = self
            .repository
            .find_grant(domain, grant_id)
            .await?
            .filter(|grant| {
                policy.permits(&context, PolicyAction::Read, grant)
                    || policy.can_delete(&context, grant)
            })
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "{} access '{grant_id}' does not exist",
                    domain.as_str()
                ))
            })?;

        user_access_statements(domain).authorize(
            &context,
            ApiAction::Destroy,
            ActionTarget::Instance(&grant),
        )?;

        let deleted = self
            .repository
            .delete_grants(domain, &[grant.id()], actor.username())
            .await?;

        info!(
            actor = actor.username(),
            domain = domain.as_str(),
            %grant_id,
            "revoked access"
        );

        Ok(deleted == 1)
    }

    /// Active areas the actor may hand out grants for.
    pub async fn accessible_areas(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
    ) -> AppResult<Vec<AreaRef>> {
        let context = self.context(actor).await?;
        let areas = self.area_directory.list_areas().await?;

        Ok(accessible_areas(&context, domain, &areas))
    }

    async fn resolve_grantee(&self, username: &str) -> AppResult<UserIdentity> {
        let username = NonEmptyString::new(username)
            .map_err(|_| AppError::invalid_field("user", "user is required"))?;

        self.user_directory
            .find_by_username(username.as_str())
            .await?
            .ok_or_else(|| AppError::invalid_field("user", format!("unknown user '{username}'")))
    }
}

/// Creating a grant at the location of a held one replaces its mode, so the
/// actor must also be allowed to create a grant in the mode being replaced.
fn authorize_replacement(
    statements: &PolicyStatements<UserAccessGrant, GrantRequest>,
    context: &AccessContext,
    held: &[UserAccessGrant],
    request: &GrantRequest,
) -> AppResult<()> {
    let replaced = held.iter().find(|grant| {
        grant.country().value() == request.country && grant.area().value() == request.area
    });

    match replaced {
        Some(grant) if grant.mode() != request.mode => {
            let current = GrantRequest {
                mode: grant.mode(),
                ..*request
            };
            statements.authorize(context, ApiAction::Create, ActionTarget::Creation(&current))
        }
        Some(_) | None => Ok(()),
    }
}
