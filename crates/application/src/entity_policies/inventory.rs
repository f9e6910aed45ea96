use fieldkit_domain::{
    AccessMode, Geography, Inventory, InventoryAssetRelation, InventoryState, ModelKind,
    PermissionVerb, UserAccessGrant,
};

use super::{
    EntityAccessPolicy, Scoping, geographic_admits, geographic_clause, holds_blanket,
    passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition};

/// Access rules of inventories.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryPolicy;

impl EntityAccessPolicy for InventoryPolicy {
    type Row = Inventory;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        ModelKind::Inventory
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        if !passes_model_gate(context, self.model(), action) {
            return Scoping::Nothing;
        }

        // Validated inventories are frozen, blanket permissions included.
        let filter = if action.is_mutation() {
            AccessPredicate::condition(RowCondition::StateIsNot(
                InventoryState::Validated.as_str(),
            ))
        } else {
            AccessPredicate::All
        };
        if holds_blanket(context, self.model(), action) {
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
        let mut terms = Vec::with_capacity(2);
        if grant.mode() == AccessMode::Officer && action.is_mutation() {
            terms.push(AccessPredicate::condition(RowCondition::StateIs(
                InventoryState::OnGoing.as_str(),
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
        row: &Inventory,
    ) -> bool {
        if grant.mode() == AccessMode::Officer
            && action.is_mutation()
            && row.state != InventoryState::OnGoing
        {
            return false;
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
            .any(|grant| {
                grant.mode().is_operator() || grant.mode() == AccessMode::InventoryValidator
            })
    }
}

/// Access rules of inventory lines, inherited from their inventory.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryAssetRelationPolicy {
    inventories: InventoryPolicy,
}

impl EntityAccessPolicy for InventoryAssetRelationPolicy {
    type Row = InventoryAssetRelation;
    type Draft = Inventory;

    fn model(&self) -> ModelKind {
        ModelKind::InventoryAssetRelation
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        self.inventories.scoping(context, action)
    }

    fn grant_clause(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        self.inventories.grant_clause(context, grant, action)
    }

    fn grant_admits(
        &self,
        context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &InventoryAssetRelation,
    ) -> bool {
        self.inventories
            .grant_admits(context, grant, action, &row.inventory)
    }

    /// Adding a line edits the inventory.
    fn can_create(&self, context: &AccessContext, draft: &Inventory) -> bool {
        self.inventories.permits(context, PolicyAction::Edit, draft)
    }
}
