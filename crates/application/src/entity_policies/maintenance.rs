use fieldkit_domain::{
    AssetMaintenance, Geography, MaintenanceState, ModelKind, PermissionVerb, UserAccessGrant,
};

use super::{
    EntityAccessPolicy, FieldAccess, Scoping, geographic_admits, geographic_clause,
    holds_blanket, passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition};

/// Access rules of maintenance records.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaintenancePolicy;

impl EntityAccessPolicy for MaintenancePolicy {
    type Row = AssetMaintenance;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        ModelKind::AssetMaintenance
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        if !passes_model_gate(context, self.model(), action) {
            return Scoping::Nothing;
        }
        if holds_blanket(context, self.model(), action) {
            return Scoping::Everything(AccessPredicate::All);
        }

        // Closed records stay editable for blanket holders only.
        if action.is_mutation() {
            return Scoping::PerGrant(AccessPredicate::condition(RowCondition::StateIsNot(
                MaintenanceState::Done.as_str(),
            )));
        }

        Scoping::PerGrant(AccessPredicate::All)
    }

    fn grant_clause(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        _action: PolicyAction,
    ) -> AccessPredicate {
        geographic_clause(grant)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        _action: PolicyAction,
        row: &AssetMaintenance,
    ) -> bool {
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

    fn scope_fields(
        &self,
        _context: &AccessContext,
        instance: Option<&AssetMaintenance>,
        mut fields: FieldAccess,
    ) -> FieldAccess {
        if instance.is_some() {
            fields.mark_read_only(AssetMaintenance::TYPE_FIELD);
        }

        fields
    }
}
