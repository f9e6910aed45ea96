//! Domain entities and invariants.

#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod access;
mod allocations;
mod assets;
mod disposal;
mod geography;
mod inventory;
mod maintenance;
mod procurement;
mod security;

pub use access::{AccessDomain, AccessMode, UserAccessGrant};
pub use allocations::{
    AllocationKind, AssetAllocation, Confirmation, ConfirmationState, ConfirmationType,
};
pub use assets::{Asset, AssetState, AssetTransition};
pub use disposal::{DisposalPlan, DisposalPlanState, DisposalPlanTransition};
pub use geography::{AreaId, CountryId, Geography, Place, Premises, Scope};
pub use inventory::{Inventory, InventoryAssetRelation, InventoryState, InventoryTransition};
pub use maintenance::{AssetMaintenance, MaintenanceState, MaintenanceTransition, MaintenanceType};
pub use procurement::{Procurement, Supplier};
pub use security::{AuditAction, ModelKind, Permission, PermissionSet, PermissionVerb};
