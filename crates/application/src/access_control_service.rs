use std::sync::Arc;

use fieldkit_core::{AppError, AppResult, RecordId, UserIdentity};
use tracing::debug;

use crate::access_context::{AccessContext, PolicyAction};
use crate::access_ports::ScopedRecordRepository;
use crate::access_predicate::{AccessPredicate, ScopedRow};
use crate::authorization_service::AuthorizationService;
use crate::entity_policies::{EntityAccessPolicy, FieldAccess};
use crate::transition_checks::TransitionAuthorization;

#[cfg(test)]
mod tests;

/// Entry point used by listing, mutation and workflow layers.
///
/// Resolves the caller context once per call and delegates every decision to
/// the entity policy. Listings and existence checks are pushed down to the
/// record repository so storage applies the same predicate.
#[derive(Clone)]
pub struct AccessControlService {
    authorization_service: AuthorizationService,
    records: Arc<dyn ScopedRecordRepository>,
}

impl AccessControlService {
    /// Creates a new access control service.
    #[must_use]
    pub fn new(
        authorization_service: AuthorizationService,
        records: Arc<dyn ScopedRecordRepository>,
    ) -> Self {
        Self {
            authorization_service,
            records,
        }
    }

    /// Resolves the context of a caller.
    pub async fn context(&self, user: Option<&UserIdentity>) -> AppResult<AccessContext> {
        self.authorization_service.resolve_context(user).await
    }

    /// Predicate of the rows the caller may access for `action`.
    pub async fn scope_queryset<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        action: PolicyAction,
    ) -> AppResult<AccessPredicate> {
        let context = self.context(user).await?;
        Ok(policy.scoped(&context, action))
    }

    /// Identifiers of the rows the caller may access for `action`, filtered by
    /// storage.
    pub async fn list_scoped_ids<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        action: PolicyAction,
    ) -> AppResult<Vec<RecordId>> {
        let predicate = self.scope_queryset(user, policy, action).await?;
        if predicate.is_nothing() {
            return Ok(Vec::new());
        }

        self.records.list_record_ids(policy.model(), &predicate).await
    }

    /// Checks one stored row against the caller scope. Rows outside the read
    /// scope are reported as missing so their existence does not leak.
    pub async fn require_scoped_record<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        record_id: RecordId,
        action: PolicyAction,
    ) -> AppResult<()> {
        let context = self.context(user).await?;
        let model = policy.model();

        let visible = self
            .records
            .record_matches(model, record_id, &policy.scope_queryset(&context))
            .await?;
        if !visible {
            return Err(AppError::NotFound(format!(
                "{} '{record_id}' does not exist",
                model.as_str()
            )));
        }
        if action == PolicyAction::Read {
            return Ok(());
        }

        let allowed = self
            .records
            .record_matches(model, record_id, &policy.scoped(&context, action))
            .await?;
        if !allowed {
            debug!(
                model = model.as_str(),
                action = action.as_str(),
                %record_id,
                "record outside caller scope"
            );
            return Err(AppError::permission_denied());
        }

        Ok(())
    }

    /// Whether the caller may apply `action` to the loaded instance.
    pub async fn can_mutate_instance<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        instance: &P::Row,
        action: PolicyAction,
    ) -> AppResult<bool> {
        let context = self.context(user).await?;
        Ok(policy.can_mutate_instance(&context, instance, action))
    }

    /// Same as [`AccessControlService::can_mutate_instance`], reporting rows
    /// outside the read scope as missing and other denials as forbidden.
    pub async fn require_mutation<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        instance: &P::Row,
        action: PolicyAction,
    ) -> AppResult<()> {
        let context = self.context(user).await?;
        if !policy.permits(&context, PolicyAction::Read, instance) {
            return Err(AppError::NotFound(format!(
                "{} '{}' does not exist",
                policy.model().as_str(),
                instance
                    .row_id()
                    .map(|row_id| row_id.to_string())
                    .unwrap_or_default()
            )));
        }
        if !policy.can_mutate_instance(&context, instance, action) {
            return Err(AppError::permission_denied());
        }

        Ok(())
    }

    /// Field writability of the instance for the caller.
    pub async fn scope_fields<P: EntityAccessPolicy>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        instance: Option<&P::Row>,
        fields: FieldAccess,
    ) -> AppResult<FieldAccess> {
        let context = self.context(user).await?;
        Ok(policy.scope_fields(&context, instance, fields))
    }

    /// Workflow hook: whether the caller may play `transition` on `entity`.
    pub async fn scope_workflow_transition_check<P: TransitionAuthorization>(
        &self,
        user: Option<&UserIdentity>,
        policy: &P,
        entity: &P::Entity,
        transition: P::Transition,
    ) -> AppResult<bool> {
        let context = self.context(user).await?;
        Ok(policy.scope_workflow_transition_check(&context, entity, transition))
    }
}
