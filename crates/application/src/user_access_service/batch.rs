use std::str::FromStr;

use tracing::{debug, info};

use super::*;

impl UserAccessService {
    /// Creates one grant per requested area, or a single grant without area
    /// when none is given. Every grant is authorized before any is written,
    /// and all of them are stored in one transaction.
    pub async fn create_many(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
        input: CreateGrantsInput,
    ) -> AppResult<Vec<UserAccessGrant>> {
        let mode = AccessMode::from_str(input.mode.trim())?;
        domain.ensure_mode_supported(mode)?;

        let context = self.context(actor).await?;
        let statements = user_access_statements(domain);
        statements.authorize(&context, ApiAction::CreateMany, ActionTarget::Collection)?;

        let grantee = self.resolve_grantee(&input.username).await?;
        let held = self
            .repository
            .list_grants_for_user(domain, grantee.user_id())
            .await?;
        let areas: Vec<Option<AreaId>> = if input.areas.is_empty() || !domain.has_area_axis() {
            vec![None]
        } else {
            input.areas.iter().copied().map(Some).collect()
        };

        let mut grants = Vec::with_capacity(areas.len());
        for area in areas {
            let request = GrantRequest {
                country: input.country,
                area,
                mode,
            };
            statements.authorize(&context, ApiAction::Create, ActionTarget::Creation(&request))?;
            authorize_replacement(&statements, &context, &held, &request)?;

            grants.push(UserAccessGrant::new(
                RecordId::new(),
                domain,
                grantee.user_id(),
                Scope::from_option(input.country),
                Scope::from_option(area),
                mode,
            ));
        }

        let stored = self
            .repository
            .upsert_grants(domain, &grants, actor.username())
            .await?;

        info!(
            actor = actor.username(),
            grantee = grantee.username(),
            domain = domain.as_str(),
            mode = mode.as_str(),
            count = stored.len(),
            "granted access"
        );

        Ok(stored)
    }

    /// Deletes the listed grants the actor may delete and returns how many were
    /// deleted. Other identifiers are skipped.
    pub async fn delete_many(
        &self,
        actor: &UserIdentity,
        domain: AccessDomain,
        grant_ids: &[RecordId],
    ) -> AppResult<u64> {
        let context = self.context(actor).await?;
        user_access_statements(domain).authorize(
            &context,
            ApiAction::DeleteMany,
            ActionTarget::Collection,
        )?;

        let policy = UserAccessPolicy::new(domain);
        let mut deletable = Vec::with_capacity(grant_ids.len());
        for grant_id in grant_ids {
            match self.repository.find_grant(domain, *grant_id).await? {
                Some(grant) if policy.can_delete(&context, &grant) => deletable.push(grant.id()),
                Some(_) | None => debug!(%grant_id, "skipping grant outside delete scope"),
            }
        }
        if deletable.is_empty() {
            return Ok(0);
        }

        let deleted = self
            .repository
            .delete_grants(domain, &deletable, actor.username())
            .await?;

        info!(
            actor = actor.username(),
            domain = domain.as_str(),
            requested = grant_ids.len(),
            deleted,
            "revoked access"
        );

        Ok(deleted)
    }
}
