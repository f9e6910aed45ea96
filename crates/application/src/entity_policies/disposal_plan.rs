use fieldkit_domain::{
    AccessMode, Asset, DisposalPlan, DisposalPlanState, ModelKind, PermissionVerb,
    UserAccessGrant,
};

use super::{
    AssetPolicy, EntityAccessPolicy, FieldAccess, Scoping, geographic_admits, geographic_clause,
    passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition};

/// Data needed to authorize a new disposal plan.
#[derive(Debug, Clone, Default)]
pub struct DisposalPlanDraft {
    /// Assets the plan will dispose of.
    pub assets: Vec<Asset>,
}

/// Access rules of disposal plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisposalPlanPolicy {
    assets: AssetPolicy,
}

impl EntityAccessPolicy for DisposalPlanPolicy {
    type Row = DisposalPlan;
    type Draft = DisposalPlanDraft;

    fn model(&self) -> ModelKind {
        ModelKind::DisposalPlan
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        if !passes_model_gate(context, self.model(), action) {
            return Scoping::Nothing;
        }

        let filter = if action.is_mutation() {
            AccessPredicate::condition(RowCondition::StateIsNot(DisposalPlanState::Done.as_str()))
        } else {
            AccessPredicate::All
        };

        let blanket = match action {
            PolicyAction::Read => context.allows_all(PermissionVerb::View, self.model()),
            PolicyAction::Edit => context.allows_all(PermissionVerb::Change, self.model()),
            PolicyAction::Delete => context.allows_all(PermissionVerb::Delete, self.model()),
            PolicyAction::PlayTransition => {
                // Finance validation stays with disposal validators.
                if context.allows_all(PermissionVerb::Change, self.model()) {
                    return Scoping::Everything(AccessPredicate::condition(
                        RowCondition::StateIsNot(
                            DisposalPlanState::UnderFinanceValidation.as_str(),
                        ),
                    ));
                }
                false
            }
        };
        if blanket {
            return Scoping::Everything(filter);
        }

        Scoping::PerGrant(filter)
    }

    fn grant_clause(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        if grant.mode() == AccessMode::DisposalValidator
            && !matches!(action, PolicyAction::Read | PolicyAction::PlayTransition)
        {
            return AccessPredicate::Nothing;
        }

        let mut terms = Vec::with_capacity(2);
        if action == PolicyAction::Delete {
            terms.push(AccessPredicate::condition(RowCondition::StateIs(
                DisposalPlanState::Draft.as_str(),
            )));
        }
        terms.push(geographic_clause(grant));

        AccessPredicate::all_of(terms)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &DisposalPlan,
    ) -> bool {
        if grant.mode() == AccessMode::DisposalValidator
            && !matches!(action, PolicyAction::Read | PolicyAction::PlayTransition)
        {
            return false;
        }
        if action == PolicyAction::Delete && row.state != DisposalPlanState::Draft {
            return false;
        }

        geographic_admits(grant, row)
    }

    /// The creator must be able to edit every asset of the plan, and the plan
    /// must reference at least one asset.
    fn can_create(&self, context: &AccessContext, draft: &DisposalPlanDraft) -> bool {
        if !context.allows(PermissionVerb::Add, self.model()) {
            return false;
        }

        !draft.assets.is_empty()
            && draft
                .assets
                .iter()
                .all(|asset| self.assets.permits(context, PolicyAction::Edit, asset))
    }

    fn scope_fields(
        &self,
        _context: &AccessContext,
        instance: Option<&DisposalPlan>,
        mut fields: FieldAccess,
    ) -> FieldAccess {
        let Some(plan) = instance else {
            return fields;
        };

        if !plan.is_under_drafting() {
            for field in DisposalPlan::REVIEWED_FIELDS {
                fields.mark_read_only(field);
            }
        }
        if plan.state == DisposalPlanState::Done {
            fields.mark_read_only(DisposalPlan::DISPOSED_DATE_FIELD);
        }

        fields
    }
}
