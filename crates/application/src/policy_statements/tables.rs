use fieldkit_domain::{
    AccessDomain, AllocationKind, Asset, AssetAllocation, AssetMaintenance, DisposalPlan,
    Geography, Inventory, InventoryAssetRelation, ModelKind, Permission, PermissionVerb,
    Procurement, Supplier, UserAccessGrant,
};

use super::{ActionTarget, ApiAction, PolicyStatements, StatementCondition};
use crate::access_context::{AccessContext, PolicyAction};
use crate::entity_policies::{
    AllocationPolicy, AssetPolicy, DisposalPlanDraft, DisposalPlanPolicy, EntityAccessPolicy,
    GrantRequest, InventoryAssetRelationPolicy, InventoryPolicy, MaintenancePolicy,
    ProcurementPolicy, SupplierPolicy, UserAccessPolicy,
};

use ApiAction::{
    CreateAttachments, DeleteAttachment, DownloadAttachment, Export, ExportInventories,
    ExportPdf, ExportUsagesPdf, FetchExternalData, GetAuditLog, List, ListAttachments,
    MakeDonationCertificate, PartialUpdate, Retrieve, SuggestAccessories, Update,
};

fn has<R, D>(verb: PermissionVerb, model: ModelKind) -> StatementCondition<R, D> {
    StatementCondition::HasPermission(Permission::Model(verb, model))
}

fn instance_check<P>(
    name: &'static str,
    policy: P,
    action: PolicyAction,
) -> StatementCondition<P::Row, P::Draft>
where
    P: EntityAccessPolicy + 'static,
{
    StatementCondition::check(name, move |context: &AccessContext, target| match target {
        ActionTarget::Instance(row) => policy.can_mutate_instance(context, row, action),
        ActionTarget::Collection | ActionTarget::Creation(_) => false,
    })
}

fn creation_check<P>(policy: P) -> StatementCondition<P::Row, P::Draft>
where
    P: EntityAccessPolicy + 'static,
{
    StatementCondition::check(
        "can_create_instance",
        move |context: &AccessContext, target| match target {
            ActionTarget::Creation(draft) => policy.can_create(context, draft),
            ActionTarget::Collection | ActionTarget::Instance(_) => false,
        },
    )
}

/// Asset actions. Mutations rely on instance checks only, so holders of the
/// purchase number permission reach the update endpoints.
#[must_use]
pub fn asset_statements() -> PolicyStatements<Asset, Geography> {
    let policy = AssetPolicy;
    let model = ModelKind::Asset;

    PolicyStatements::new(model)
        .allow(
            &[
                List,
                Retrieve,
                GetAuditLog,
                SuggestAccessories,
                FetchExternalData,
                Export,
                ExportUsagesPdf,
            ],
            vec![StatementCondition::HasAnyPermission(vec![
                Permission::Model(PermissionVerb::View, model),
                Permission::ModelAll(PermissionVerb::View, model),
            ])],
        )
        .allow(
            &[Update, PartialUpdate, ApiAction::PlayTransition],
            vec![instance_check("can_update_instance", policy, PolicyAction::Edit)],
        )
        .allow(&[ApiAction::Create], vec![creation_check(policy)])
        .allow(
            &[ApiAction::Destroy],
            vec![instance_check("can_delete_instance", policy, PolicyAction::Delete)],
        )
}

/// Allocation actions of one allocation kind.
#[must_use]
pub fn allocation_statements(kind: AllocationKind) -> PolicyStatements<AssetAllocation, Geography> {
    let policy = AllocationPolicy::new(kind);
    let model = kind.model();

    PolicyStatements::new(model)
        .allow(
            &[List, Retrieve, GetAuditLog],
            vec![has(PermissionVerb::View, model)],
        )
        .allow(
            &[Update, PartialUpdate],
            vec![
                has(PermissionVerb::Change, model),
                instance_check("can_update_instance", policy, PolicyAction::Edit),
            ],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
}

/// Inventory actions. Transitions are played by whoever may edit.
#[must_use]
pub fn inventory_statements() -> PolicyStatements<Inventory, Geography> {
    let policy = InventoryPolicy;
    let model = ModelKind::Inventory;

    PolicyStatements::new(model)
        .allow(
            &[List, Retrieve, GetAuditLog, ExportPdf, ExportInventories],
            vec![has(PermissionVerb::View, model)],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[Update, PartialUpdate, ApiAction::PlayTransition],
            vec![
                has(PermissionVerb::Change, model),
                instance_check("can_update_instance", policy, PolicyAction::Edit),
            ],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
}

/// Inventory line actions, both requiring edit rights on the inventory.
#[must_use]
pub fn inventory_asset_relation_statements()
-> PolicyStatements<InventoryAssetRelation, Inventory> {
    let policy = InventoryAssetRelationPolicy::default();
    let inventories = InventoryPolicy;

    PolicyStatements::new(ModelKind::InventoryAssetRelation)
        .allow(
            &[ApiAction::Create],
            vec![
                has(PermissionVerb::Change, ModelKind::Inventory),
                creation_check(policy),
            ],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Change, ModelKind::Inventory),
                StatementCondition::check(
                    "can_delete_instance",
                    move |context: &AccessContext,
                          target: ActionTarget<'_, InventoryAssetRelation, Inventory>| {
                        match target {
                            ActionTarget::Instance(relation) => inventories.can_mutate_instance(
                                context,
                                &relation.inventory,
                                PolicyAction::Edit,
                            ),
                            ActionTarget::Collection | ActionTarget::Creation(_) => false,
                        }
                    },
                ),
            ],
        )
}

/// Disposal plan actions.
#[must_use]
pub fn disposal_plan_statements() -> PolicyStatements<DisposalPlan, DisposalPlanDraft> {
    let policy = DisposalPlanPolicy::default();
    let model = ModelKind::DisposalPlan;

    PolicyStatements::new(model)
        .allow(
            &[
                List,
                Retrieve,
                GetAuditLog,
                ListAttachments,
                DownloadAttachment,
                MakeDonationCertificate,
            ],
            vec![has(PermissionVerb::View, model)],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[ApiAction::PlayTransition],
            vec![instance_check(
                "can_transition_instance",
                policy,
                PolicyAction::PlayTransition,
            )],
        )
        .allow(
            &[Update, PartialUpdate, CreateAttachments, DeleteAttachment],
            vec![
                has(PermissionVerb::Change, model),
                instance_check("can_update_instance", policy, PolicyAction::Edit),
            ],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
}

/// Maintenance actions.
#[must_use]
pub fn maintenance_statements() -> PolicyStatements<AssetMaintenance, Geography> {
    let policy = MaintenancePolicy;
    let model = ModelKind::AssetMaintenance;

    PolicyStatements::new(model)
        .allow(
            &[List, Retrieve, GetAuditLog, ListAttachments, DownloadAttachment],
            vec![has(PermissionVerb::View, model)],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[
                Update,
                PartialUpdate,
                CreateAttachments,
                DeleteAttachment,
                ApiAction::PlayTransition,
            ],
            vec![
                has(PermissionVerb::Change, model),
                instance_check("can_update_instance", policy, PolicyAction::Edit),
            ],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
}

fn registry_statements<P>(policy: P) -> PolicyStatements<P::Row, P::Draft>
where
    P: EntityAccessPolicy + Copy + 'static,
{
    let model = policy.model();

    PolicyStatements::new(model)
        .allow(
            &[List, Retrieve, GetAuditLog],
            vec![has(PermissionVerb::View, model)],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[Update, PartialUpdate],
            vec![
                has(PermissionVerb::Change, model),
                instance_check("can_update_instance", policy, PolicyAction::Edit),
            ],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
}

/// Supplier registry actions.
#[must_use]
pub fn supplier_statements() -> PolicyStatements<Supplier, Geography> {
    registry_statements(SupplierPolicy)
}

/// Procurement actions.
#[must_use]
pub fn procurement_statements() -> PolicyStatements<Procurement, Geography> {
    registry_statements(ProcurementPolicy)
}

/// Grant administration actions of one domain. Batch endpoints only carry the
/// coarse gate; each entry is checked by the grant service.
#[must_use]
pub fn user_access_statements(
    domain: AccessDomain,
) -> PolicyStatements<UserAccessGrant, GrantRequest> {
    let policy = UserAccessPolicy::new(domain);
    let model = ModelKind::user_access_of(domain);

    PolicyStatements::new(model)
        .allow(&[List], vec![has(PermissionVerb::View, model)])
        .allow(
            &[ApiAction::CreateMany],
            vec![has(PermissionVerb::Add, model)],
        )
        .allow(
            &[ApiAction::Create],
            vec![has(PermissionVerb::Add, model), creation_check(policy)],
        )
        .allow(
            &[ApiAction::Destroy],
            vec![
                has(PermissionVerb::Delete, model),
                instance_check("can_delete_instance", policy, PolicyAction::Delete),
            ],
        )
        .allow(
            &[ApiAction::DeleteMany],
            vec![has(PermissionVerb::Delete, model)],
        )
}
