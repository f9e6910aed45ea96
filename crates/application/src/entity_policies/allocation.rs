use fieldkit_domain::{
    AccessMode, AllocationKind, AssetAllocation, Geography, ModelKind, PermissionVerb,
    UserAccessGrant,
};

use super::{
    EntityAccessPolicy, Scoping, geographic_admits, geographic_clause, holds_blanket,
    passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition};

/// Access rules of asset allocations. Officers only mutate allocations they
/// authored (project contracts) or transfers still waiting for the receiving
/// premises (premises allocations).
#[derive(Debug, Clone, Copy)]
pub struct AllocationPolicy {
    kind: AllocationKind,
}

impl AllocationPolicy {
    /// Creates the policy of one allocation kind.
    #[must_use]
    pub fn new(kind: AllocationKind) -> Self {
        Self { kind }
    }

    fn officer_restriction(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> Option<AccessPredicate> {
        if grant.mode() != AccessMode::Officer || !action.is_mutation() {
            return None;
        }

        match self.kind {
            AllocationKind::ProjectContract => Some(match context.user_id() {
                Some(user_id) => AccessPredicate::condition(RowCondition::CreatedBy(user_id)),
                None => AccessPredicate::Nothing,
            }),
            AllocationKind::Premises => Some(AccessPredicate::condition(
                RowCondition::WaitingTransferConfirmation,
            )),
            AllocationKind::Usage => None,
        }
    }
}

impl EntityAccessPolicy for AllocationPolicy {
    type Row = AssetAllocation;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        self.kind.model()
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        if !passes_model_gate(context, self.model(), action) {
            return Scoping::Nothing;
        }
        if holds_blanket(context, self.model(), action) {
            return Scoping::Everything(AccessPredicate::All);
        }

        Scoping::PerGrant(AccessPredicate::All)
    }

    fn grant_clause(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        let mut terms = Vec::with_capacity(2);
        if let Some(restriction) = self.officer_restriction(context, grant, action) {
            terms.push(restriction);
        }
        terms.push(geographic_clause(grant));

        AccessPredicate::all_of(terms)
    }

    fn grant_admits(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &AssetAllocation,
    ) -> bool {
        if grant.mode() == AccessMode::Officer && action.is_mutation() {
            let restricted = match self.kind {
                AllocationKind::ProjectContract => {
                    context.user_id().is_some() && row.created_by == context.user_id()
                }
                AllocationKind::Premises => row.has_waiting_transfer(),
                AllocationKind::Usage => true,
            };
            if !restricted {
                return false;
            }
        }

        geographic_admits(grant, row)
    }

    fn can_create(&self, context: &AccessContext, draft: &Geography) -> bool {
        if !context.allows(PermissionVerb::Add, self.model()) {
            return false;
        }
        if context.allows_all(PermissionVerb::Add, self.model()) {
            return true;
        }

        context
            .grants_applying_to(self.domain(), *draft)
            .any(|grant| grant.mode().is_operator())
    }
}
