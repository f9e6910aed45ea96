use fieldkit_domain::{
    Asset, AssetState, Geography, ModelKind, Permission, PermissionVerb,
    UserAccessGrant,
};

use super::{
    EntityAccessPolicy, FieldAccess, Scoping, geographic_admits, geographic_clause,
    holds_blanket, passes_model_gate,
};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition};

/// Access rules of assets.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssetPolicy;

impl AssetPolicy {
    /// Whether the caller edits the asset through `change_asset_all` or a
    /// geography grant, ignoring the purchase number permission.
    #[must_use]
    pub fn edits_through_grants(&self, context: &AccessContext, asset: &Asset) -> bool {
        if context.allows_all(PermissionVerb::Change, ModelKind::Asset) {
            return true;
        }

        context.allows(PermissionVerb::Change, ModelKind::Asset)
            && context
                .grants(self.domain())
                .any(|grant| self.grant_admits(context, grant, PolicyAction::Edit, asset))
    }
}

impl EntityAccessPolicy for AssetPolicy {
    type Row = Asset;
    type Draft = Geography;

    fn model(&self) -> ModelKind {
        ModelKind::Asset
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        let purchase_number = context.has(Permission::ChangeAssetPurchaseNumber);
        let gated = passes_model_gate(context, self.model(), action)
            || (action == PolicyAction::Edit && purchase_number);
        if !gated {
            return Scoping::Nothing;
        }

        if holds_blanket(context, self.model(), action) {
            return Scoping::Everything(AccessPredicate::All);
        }

        // Every asset is editable, field masking narrows it to purchase_number.
        if action == PolicyAction::Edit && purchase_number {
            return Scoping::Everything(AccessPredicate::All);
        }

        Scoping::PerGrant(AccessPredicate::All)
    }

    fn grant_clause(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
    ) -> AccessPredicate {
        let mut terms = Vec::new();
        if action == PolicyAction::Delete {
            if !grant.mode().is_supervisor() {
                return AccessPredicate::Nothing;
            }
            terms.push(AccessPredicate::condition(RowCondition::StateIs(
                AssetState::InStock.as_str(),
            )));
        }
        if grant.mode().is_validator() && action.is_mutation() {
            return AccessPredicate::Nothing;
        }
        terms.push(geographic_clause(grant));

        AccessPredicate::all_of(terms)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &Asset,
    ) -> bool {
        if action == PolicyAction::Delete
            && (!grant.mode().is_supervisor() || row.state != AssetState::InStock)
        {
            return false;
        }
        if grant.mode().is_validator() && action.is_mutation() {
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

        // The area is unknown until the asset is placed in premises.
        context
            .grants(self.domain())
            .any(|grant| grant.mode().is_operator() && grant.country().contains(draft.country))
    }

    fn scope_fields(
        &self,
        context: &AccessContext,
        instance: Option<&Asset>,
        mut fields: FieldAccess,
    ) -> FieldAccess {
        let Some(asset) = instance else {
            return fields;
        };
        if !context.has(Permission::ChangeAssetPurchaseNumber)
            || self.edits_through_grants(context, asset)
        {
            return fields;
        }

        fields.restrict_to(&[Asset::PURCHASE_NUMBER_FIELD]);
        fields
    }
}
