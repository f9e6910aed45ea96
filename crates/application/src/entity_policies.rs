//! Per-entity row access policies.
//!
//! Every policy follows the same scheme: anonymous callers and callers without
//! the coarse model permission get nothing, blanket `-all` permissions short
//! circuit to every row, and everybody else gets the union of one clause per
//! grant they hold in the policy domain.

mod allocation;
mod asset;
mod disposal_plan;
mod fields;
mod inventory;
mod maintenance;
mod registry;
mod user_access;


pub use allocation::AllocationPolicy;
pub use asset::AssetPolicy;
pub use disposal_plan::{DisposalPlanDraft, DisposalPlanPolicy};
pub use fields::FieldAccess;
pub use inventory::{InventoryAssetRelationPolicy, InventoryPolicy};
pub use maintenance::MaintenancePolicy;
pub use registry::{ProcurementPolicy, SupplierPolicy};
pub use user_access::{AreaRef, GrantRequest, UserAccessPolicy, accessible_areas};

use fieldkit_domain::{AccessDomain, ModelKind, Scope, UserAccessGrant};
use tracing::debug;

use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition, ScopedRow};

/// Outcome of the permission checks that run before grants are looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scoping {
    /// The caller sees no row.
    Nothing,
    /// A blanket permission applies; rows are only narrowed by the filter.
    Everything(AccessPredicate),
    /// Rows must pass the filter and at least one grant clause.
    PerGrant(AccessPredicate),
}

/// Row access rules of one entity type.
pub trait EntityAccessPolicy: Send + Sync {
    /// Row snapshot the policy evaluates.
    type Row: ScopedRow;
    /// Data known before a row is created.
    type Draft;

    /// Permission model of the entity.
    fn model(&self) -> ModelKind;

    /// Grant table consulted by the policy.
    fn domain(&self) -> AccessDomain {
        AccessDomain::Asset
    }

    /// Coarse permission gates, filters independent of grants and blanket
    /// permission fast paths.
    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping;

    /// Clause contributed by one grant, as a composable predicate.
    fn grant_clause(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate;

    /// Clause contributed by one grant, evaluated directly against a row.
    /// Must agree with [`EntityAccessPolicy::grant_clause`].
    fn grant_admits(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &Self::Row,
    ) -> bool;

    /// Whether the caller may create a row described by `draft`.
    fn can_create(&self, context: &AccessContext, draft: &Self::Draft) -> bool;

    /// Marks fields read-only for the instance. `None` stands for a collection
    /// or a creation form.
    fn scope_fields(
        &self,
        _context: &AccessContext,
        _instance: Option<&Self::Row>,
        fields: FieldAccess,
    ) -> FieldAccess {
        fields
    }

    /// Predicate of the rows the caller may access for `action`.
    fn scoped(&self, context: &AccessContext, action: PolicyAction) -> AccessPredicate {
        match self.scoping(context, action) {
            Scoping::Nothing => AccessPredicate::Nothing,
            Scoping::Everything(filter) => filter,
            Scoping::PerGrant(filter) => filter.and(AccessPredicate::any_of(
                context
                    .grants(self.domain())
                    .map(|grant| self.grant_clause(context, grant, action)),
            )),
        }
    }

    /// Read scoping used by listings.
    fn scope_queryset(&self, context: &AccessContext) -> AccessPredicate {
        self.scoped(context, PolicyAction::Read)
    }

    /// Direct evaluation of [`EntityAccessPolicy::scoped`] on one row.
    fn permits(&self, context: &AccessContext, action: PolicyAction, row: &Self::Row) -> bool {
        match self.scoping(context, action) {
            Scoping::Nothing => false,
            Scoping::Everything(filter) => filter.matches(row),
            Scoping::PerGrant(filter) => {
                filter.matches(row)
                    && context
                        .grants(self.domain())
                        .any(|grant| self.grant_admits(context, grant, action, row))
            }
        }
    }

    /// Whether the caller may apply `action` to this row.
    fn can_mutate_instance(
        &self,
        context: &AccessContext,
        instance: &Self::Row,
        action: PolicyAction,
    ) -> bool {
        let allowed = self.permits(context, action, instance);
        if !allowed {
            debug!(
                model = self.model().as_str(),
                action = action.as_str(),
                row_id = ?instance.row_id(),
                "row outside caller scope"
            );
        }

        allowed
    }
}

/// Coarse model permission check run before anything else. Transitions have
/// no coarse gate.
pub(crate) fn passes_model_gate(
    context: &AccessContext,
    model: ModelKind,
    action: PolicyAction,
) -> bool {
    if !context.is_authenticated() {
        return false;
    }

    action
        .verb()
        .is_none_or(|verb| context.allows(verb, model))
}

/// Blanket `-all` permission for the action.
pub(crate) fn holds_blanket(
    context: &AccessContext,
    model: ModelKind,
    action: PolicyAction,
) -> bool {
    action
        .verb()
        .is_some_and(|verb| context.allows_all(verb, model))
}

/// Area and country terms of a grant clause. A grant without country keeps a
/// primary key term so the clause is never empty.
pub(crate) fn geographic_clause(grant: &UserAccessGrant) -> AccessPredicate {
    let mut terms = Vec::with_capacity(2);
    if let Scope::Exactly(area) = grant.area() {
        terms.push(AccessPredicate::condition(RowCondition::AreaCovered(area)));
    }
    terms.push(match grant.country() {
        Scope::Exactly(country) => {
            AccessPredicate::condition(RowCondition::CountryCovered(country))
        }
        Scope::Any => AccessPredicate::condition(RowCondition::HasPrimaryKey),
    });

    AccessPredicate::all_of(terms)
}

/// Direct evaluation of [`geographic_clause`].
pub(crate) fn geographic_admits<R: ScopedRow + ?Sized>(grant: &UserAccessGrant, row: &R) -> bool {
    let geography = row.geography();
    let country_term = match grant.country() {
        Scope::Exactly(_) => grant.country().covers(geography.country),
        Scope::Any => row.row_id().is_some(),
    };

    grant.area().covers(geography.area) && country_term
}
