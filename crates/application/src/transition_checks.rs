//! Authorization hook consulted by the workflow engine before it plays a
//! transition. A `false` answer is a hard stop.


use fieldkit_domain::{
    AccessDomain, AccessMode, Asset, AssetMaintenance, AssetTransition, DisposalPlan,
    DisposalPlanState, DisposalPlanTransition, Geography, Inventory, InventoryTransition,
    MaintenanceTransition, ModelKind, Permission, PermissionVerb, UserAccessGrant,
};
use tracing::debug;

use crate::access_context::{AccessContext, PolicyAction};
use crate::entity_policies::{
    AssetPolicy, DisposalPlanPolicy, EntityAccessPolicy, InventoryPolicy, MaintenancePolicy,
};

/// Workflow transition authorization of one entity type.
pub trait TransitionAuthorization {
    /// Entity driven by the workflow engine.
    type Entity;
    /// Transition vocabulary of the entity.
    type Transition: Copy + std::fmt::Debug;

    /// Decides whether the caller may play `transition` on `entity` now.
    fn scope_workflow_transition_check(
        &self,
        context: &AccessContext,
        entity: &Self::Entity,
        transition: Self::Transition,
    ) -> bool;
}

/// Grants whose scope contains the entity, logged for diagnosis.
fn applying_grants<'a>(
    context: &'a AccessContext,
    model: ModelKind,
    transition: impl std::fmt::Debug,
    geography: Geography,
) -> Vec<&'a UserAccessGrant> {
    debug!(
        model = model.as_str(),
        ?transition,
        user_id = ?context.user_id(),
        country = ?geography.country,
        area = ?geography.area,
        "checking workflow transition"
    );

    context
        .grants_applying_to(AccessDomain::Asset, geography)
        .inspect(|grant| {
            debug!(
                mode = grant.mode().as_str(),
                country = ?grant.country(),
                area = ?grant.area(),
                "applicable grant"
            );
        })
        .collect()
}

const ASSET_OPERATOR_TRANSITIONS: &[AssetTransition] = &[
    AssetTransition::Assign,
    AssetTransition::AcceptAssign,
    AssetTransition::AcceptUnassign,
    AssetTransition::Reject,
    AssetTransition::Unassign,
    AssetTransition::SendMaintenance,
    AssetTransition::EndMaintenanceToStock,
    AssetTransition::SendRepair,
    AssetTransition::EndRepairToStock,
    AssetTransition::StartDisposal,
    AssetTransition::CancelDisposal,
];

impl TransitionAuthorization for AssetPolicy {
    type Entity = Asset;
    type Transition = AssetTransition;

    fn scope_workflow_transition_check(
        &self,
        context: &AccessContext,
        entity: &Asset,
        transition: AssetTransition,
    ) -> bool {
        if !context.is_authenticated() {
            return false;
        }
        if context.has(Permission::AllTransitions(ModelKind::Asset)) {
            return true;
        }
        // Disposal is driven by the disposal plan workflow only.
        if transition == AssetTransition::Dispose {
            return false;
        }

        applying_grants(context, self.model(), transition, entity.geography())
            .into_iter()
            .any(|grant| {
                grant.mode().is_operator() && ASSET_OPERATOR_TRANSITIONS.contains(&transition)
            })
    }
}

impl TransitionAuthorization for InventoryPolicy {
    type Entity = Inventory;
    type Transition = InventoryTransition;

    fn scope_workflow_transition_check(
        &self,
        context: &AccessContext,
        entity: &Inventory,
        transition: InventoryTransition,
    ) -> bool {
        if !context.is_authenticated() {
            return false;
        }
        if context.has(Permission::AllTransitions(ModelKind::Inventory)) {
            return true;
        }

        applying_grants(context, self.model(), transition, entity.geography())
            .into_iter()
            .any(|grant| match grant.mode() {
                AccessMode::InventoryValidator => matches!(
                    transition,
                    InventoryTransition::ToCorrect | InventoryTransition::Validate
                ),
                AccessMode::Officer => transition == InventoryTransition::Submit,
                AccessMode::Manager | AccessMode::Controller => true,
                AccessMode::DisposalValidator => false,
            })
    }
}

impl TransitionAuthorization for DisposalPlanPolicy {
    type Entity = DisposalPlan;
    type Transition = DisposalPlanTransition;

    /// The source state of the transition is the current state of the plan.
    fn scope_workflow_transition_check(
        &self,
        context: &AccessContext,
        entity: &DisposalPlan,
        transition: DisposalPlanTransition,
    ) -> bool {
        if !context.is_authenticated() {
            return false;
        }
        if context.has(Permission::AllTransitions(ModelKind::DisposalPlan)) {
            return true;
        }
        if transition == DisposalPlanTransition::Dispose {
            return false;
        }

        let under_finance = entity.state == DisposalPlanState::UnderFinanceValidation;
        if !under_finance && context.allows_all(PermissionVerb::Change, ModelKind::Asset) {
            return true;
        }

        applying_grants(context, self.model(), transition, entity.geography())
            .into_iter()
            .any(|grant| {
                if under_finance {
                    return grant.mode() == AccessMode::DisposalValidator;
                }
                if grant.mode() == AccessMode::Officer
                    && matches!(
                        transition,
                        DisposalPlanTransition::SubmitToFinance | DisposalPlanTransition::ToCorrect
                    )
                {
                    return false;
                }

                grant.mode().is_operator()
            })
    }
}

impl TransitionAuthorization for MaintenancePolicy {
    type Entity = AssetMaintenance;
    type Transition = MaintenanceTransition;

    /// Anybody allowed to edit the record may move it along its workflow.
    fn scope_workflow_transition_check(
        &self,
        context: &AccessContext,
        entity: &AssetMaintenance,
        transition: MaintenanceTransition,
    ) -> bool {
        if !context.is_authenticated() {
            return false;
        }
        if context.has(Permission::AllTransitions(ModelKind::AssetMaintenance)) {
            return true;
        }

        debug!(
            model = self.model().as_str(),
            ?transition,
            "checking workflow transition through edit scope"
        );
        self.permits(context, PolicyAction::Edit, entity)
    }
}
