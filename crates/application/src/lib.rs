//! Application services and ports.

#![forbid(unsafe_code)]

mod access_context;
mod access_control_service;
mod access_ports;
mod access_predicate;
mod authorization_service;
mod entity_policies;
mod policy_statements;
mod transition_checks;
mod user_access_service;

#[cfg(test)]
mod test_support;

pub use access_context::{AccessContext, PolicyAction};
pub use access_control_service::AccessControlService;
pub use access_ports::{
    AreaDirectory, AuditEvent, AuthorizationRepository, ScopedRecordRepository,
    UserAccessRepository, UserDirectory,
};
pub use access_predicate::{AccessPredicate, RowCondition, ScopedRow};
pub use authorization_service::AuthorizationService;
pub use entity_policies::{
    AllocationPolicy, AreaRef, AssetPolicy, DisposalPlanDraft, DisposalPlanPolicy,
    EntityAccessPolicy, FieldAccess, GrantRequest, InventoryAssetRelationPolicy, InventoryPolicy,
    MaintenancePolicy, ProcurementPolicy, Scoping, SupplierPolicy, UserAccessPolicy,
    accessible_areas,
};
pub use policy_statements::{
    ActionTarget, ApiAction, PolicyStatements, StatementCondition, allocation_statements,
    asset_statements, disposal_plan_statements, inventory_asset_relation_statements,
    inventory_statements, maintenance_statements, procurement_statements, supplier_statements,
    user_access_statements,
};
pub use transition_checks::TransitionAuthorization;
pub use user_access_service::{CreateGrantsInput, UserAccessService};
