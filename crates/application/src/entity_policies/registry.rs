use fieldkit_domain::{
    AccessDomain, Geography, ModelKind, PermissionVerb, Procurement, Supplier, UserAccessGrant,
};

use super::{
    EntityAccessPolicy, Scoping, geographic_admits, geographic_clause, holds_blanket,
    passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, ScopedRow};

// Reading is open to every mode, editing to operators, deleting to supervisors.
fn mode_allows(grant: &UserAccessGrant, action: PolicyAction) -> bool {
    match action {
        PolicyAction::Read => true,
        PolicyAction::Edit | PolicyAction::PlayTransition => grant.mode().is_operator(),
        PolicyAction::Delete => grant.mode().is_supervisor(),
    }
}

fn registry_scoping(context: &AccessContext, model: ModelKind, action: PolicyAction) -> Scoping {
    if !passes_model_gate(context, model, action) {
        return Scoping::Nothing;
    }
    if holds_blanket(context, model, action) {
        return Scoping::Everything(AccessPredicate::All);
    }

    Scoping::PerGrant(AccessPredicate::All)
}

fn registry_clause(grant: &UserAccessGrant, action: PolicyAction) -> AccessPredicate {
    if !mode_allows(grant, action) {
        return AccessPredicate::Nothing;
    }

    geographic_clause(grant)
}

fn registry_admits<R: ScopedRow>(grant: &UserAccessGrant, action: PolicyAction, row: &R) -> bool {
    mode_allows(grant, action) && geographic_admits(grant, row)
}

fn registry_can_create(
    context: &AccessContext,
    domain: AccessDomain,
    model: ModelKind,
    draft: Geography,
) -> bool {
    if !context.allows(PermissionVerb::Add, model) {
        return false;
    }
    if context.allows_all(PermissionVerb::Add, model) {
        return true;
    }

    context
        .grants_applying_to(domain, draft)
        .any(|grant| grant.mode().is_operator())
}

/// Access rules of the supplier registry, driven by supplier grants.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplierPolicy;

impl EntityAccessPolicy for SupplierPolicy {
    type Row = Supplier;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        ModelKind::Supplier
    }

    fn domain(&self) -> AccessDomain {
        AccessDomain::Supplier
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        registry_scoping(context, self.model(), action)
    }

    fn grant_clause(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        registry_clause(grant, action)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &Supplier,
    ) -> bool {
        registry_admits(grant, action, row)
    }

    fn can_create(&self, context: &AccessContext, draft: &Geography) -> bool {
        registry_can_create(context, self.domain(), self.model(), *draft)
    }
}

/// Access rules of procurement requests, driven by country-only grants.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcurementPolicy;

impl EntityAccessPolicy for ProcurementPolicy {
    type Row = Procurement;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        ModelKind::Procurement
    }

    fn domain(&self) -> AccessDomain {
        AccessDomain::Procurement
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        registry_scoping(context, self.model(), action)
    }

    fn grant_clause(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        registry_clause(grant, action)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &Procurement,
    ) -> bool {
        registry_admits(grant, action, row)
    }

    fn can_create(&self, context: &AccessContext, draft: &Geography) -> bool {
        registry_can_create(
            context,
            self.domain(),
            self.model(),
            Geography::country_only(draft.country),
        )
    }
}
