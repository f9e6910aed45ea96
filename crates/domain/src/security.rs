use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use fieldkit_core::AppError;
use serde::{Deserialize, Serialize};

use crate::access::AccessDomain;

named_vocabulary! {
    /// Verb of a model permission.
    PermissionVerb {
        /// Read rows.
        View => "view",
        /// Create rows.
        Add => "add",
        /// Update rows.
        Change => "change",
        /// Delete rows.
        Delete => "delete",
    }
}

named_vocabulary! {
    /// Persisted model a permission applies to.
    ModelKind {
        /// Physical asset.
        Asset => "asset",
        /// Asset grant rows.
        AssetUserAccess => "assetuseraccess",
        /// Supplier grant rows.
        SupplierUserAccess => "supplieruseraccess",
        /// Procurement grant rows.
        ProcurementUserAccess => "procurementuseraccess",
        /// Allocation of an asset to a project contract.
        AssetAllocationProjectContract => "assetallocationprojectcontract",
        /// Allocation of an asset to premises.
        AssetAllocationPremises => "assetallocationpremises",
        /// Allocation of an asset to a usage.
        AssetAllocationUsage => "assetallocationusage",
        /// Periodic premises inventory.
        Inventory => "inventory",
        /// Asset counted in an inventory.
        InventoryAssetRelation => "inventoryassetrelation",
        /// Plan to dispose of assets.
        DisposalPlan => "disposalplan",
        /// Maintenance or repair record.
        AssetMaintenance => "assetmaintenance",
        /// Supplier registry entry.
        Supplier => "supplier",
        /// Procurement request.
        Procurement => "procurement",
    }
}

impl ModelKind {
    /// Grant model policing access to grants of `domain`.
    #[must_use]
    pub fn user_access_of(domain: AccessDomain) -> Self {
        match domain {
            AccessDomain::Asset => Self::AssetUserAccess,
            AccessDomain::Supplier => Self::SupplierUserAccess,
            AccessDomain::Procurement => Self::ProcurementUserAccess,
        }
    }

    /// Name used by the `change_<name>_all_transitions` permission, for
    /// models driven by the workflow engine.
    #[must_use]
    pub fn transition_name(&self) -> Option<&'static str> {
        match self {
            Self::Asset => Some("asset"),
            Self::Inventory => Some("inventory"),
            Self::DisposalPlan => Some("disposal_plan"),
            Self::AssetMaintenance => Some("assetmaintenance"),
            _ => None,
        }
    }
}

/// Global named permission held by a user, independent of grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Permission {
    /// `<verb>_<model>`: the verb is allowed, narrowed by grants.
    Model(PermissionVerb, ModelKind),
    /// `<verb>_<model>_all`: blanket permission for every row.
    ModelAll(PermissionVerb, ModelKind),
    /// `change_<model>_all_transitions`: every workflow transition.
    AllTransitions(ModelKind),
    /// Write access to the purchase number of every asset.
    ChangeAssetPurchaseNumber,
}

impl Permission {
    /// Shorthand for a narrow model permission.
    #[must_use]
    pub fn model(verb: PermissionVerb, model: ModelKind) -> Self {
        Self::Model(verb, model)
    }

    /// Shorthand for a blanket model permission.
    #[must_use]
    pub fn model_all(verb: PermissionVerb, model: ModelKind) -> Self {
        Self::ModelAll(verb, model)
    }

    /// Returns the stored codename.
    #[must_use]
    pub fn codename(&self) -> String {
        match self {
            Self::Model(verb, model) => format!("{}_{}", verb.as_str(), model.as_str()),
            Self::ModelAll(verb, model) => format!("{}_{}_all", verb.as_str(), model.as_str()),
            Self::AllTransitions(model) => format!(
                "change_{}_all_transitions",
                model.transition_name().unwrap_or(model.as_str())
            ),
            Self::ChangeAssetPurchaseNumber => "change_asset_purchase_number".to_owned(),
        }
    }
}

impl Display for Permission {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.codename().as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "change_asset_purchase_number" {
            return Ok(Self::ChangeAssetPurchaseNumber);
        }

        if let Some(name) = value
            .strip_prefix("change_")
            .and_then(|rest| rest.strip_suffix("_all_transitions"))
            && let Some(model) = ModelKind::all()
                .iter()
                .find(|model| model.transition_name() == Some(name))
        {
            return Ok(Self::AllTransitions(*model));
        }

        let unknown = || AppError::Validation(format!("unknown permission '{value}'"));
        let (verb, rest) = value.split_once('_').ok_or_else(unknown)?;
        let verb = PermissionVerb::from_str(verb).map_err(|_| unknown())?;
        match rest.strip_suffix("_all") {
            Some(model) => ModelKind::from_str(model)
                .map(|model| Self::ModelAll(verb, model))
                .map_err(|_| unknown()),
            None => ModelKind::from_str(rest)
                .map(|model| Self::Model(verb, model))
                .map_err(|_| unknown()),
        }
    }
}

impl TryFrom<String> for Permission {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_str(value.as_str())
    }
}

impl From<Permission> for String {
    fn from(value: Permission) -> Self {
        value.codename()
    }
}

/// Set of global permissions resolved for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(HashSet<Permission>);

impl PermissionSet {
    /// Creates a permission set.
    #[must_use]
    pub fn new(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self(permissions.into_iter().collect())
    }

    /// Parses stored codenames, skipping the ones this service does not use.
    #[must_use]
    pub fn from_codenames<'a>(codenames: impl IntoIterator<Item = &'a str>) -> Self {
        Self(
            codenames
                .into_iter()
                .filter_map(|codename| Permission::from_str(codename).ok())
                .collect(),
        )
    }

    /// Returns whether the permission is held.
    #[must_use]
    pub fn has(&self, permission: Permission) -> bool {
        self.0.contains(&permission)
    }

    /// Returns whether at least one of the permissions is held.
    #[must_use]
    pub fn has_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|permission| self.has(*permission))
    }

    /// Returns whether the narrow or blanket form of `verb` on `model` is held.
    #[must_use]
    pub fn allows(&self, verb: PermissionVerb, model: ModelKind) -> bool {
        self.has(Permission::Model(verb, model)) || self.has(Permission::ModelAll(verb, model))
    }

    /// Returns whether the blanket form of `verb` on `model` is held.
    #[must_use]
    pub fn allows_all(&self, verb: PermissionVerb, model: ModelKind) -> bool {
        self.has(Permission::ModelAll(verb, model))
    }

    /// Iterates over held permissions.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.0.iter()
    }
}

impl FromIterator<Permission> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = Permission>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Stable audit actions emitted by application use-cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Emitted when a grant is created or its mode replaced.
    UserAccessGranted,
    /// Emitted when a grant is deleted.
    UserAccessRevoked,
}

impl AuditAction {
    /// Returns a stable storage value for this action.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserAccessGranted => "user_access.granted",
            Self::UserAccessRevoked => "user_access.revoked",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ModelKind, Permission, PermissionSet, PermissionVerb};

    #[test]
    fn parses_blanket_permissions() {
        assert_eq!(
            Permission::from_str("view_asset_all").ok(),
            Some(Permission::ModelAll(PermissionVerb::View, ModelKind::Asset))
        );
        assert_eq!(
            Permission::from_str("delete_disposalplan").ok(),
            Some(Permission::Model(
                PermissionVerb::Delete,
                ModelKind::DisposalPlan
            ))
        );
    }

    #[test]
    fn transition_permissions_use_workflow_names() {
        let permission = Permission::AllTransitions(ModelKind::DisposalPlan);
        assert_eq!(
            permission.codename(),
            "change_disposal_plan_all_transitions"
        );
        assert_eq!(
            Permission::from_str("change_disposal_plan_all_transitions").ok(),
            Some(permission)
        );
    }

    #[test]
    fn purchase_number_permission_is_not_a_model_permission() {
        assert_eq!(
            Permission::from_str("change_asset_purchase_number").ok(),
            Some(Permission::ChangeAssetPurchaseNumber)
        );
    }

    #[test]
    fn unknown_codenames_are_skipped() {
        let permissions = PermissionSet::from_codenames(["view_asset", "fly_rocket"]);
        assert_eq!(permissions.iter().count(), 1);
        assert!(permissions.allows(PermissionVerb::View, ModelKind::Asset));
        assert!(!permissions.allows_all(PermissionVerb::View, ModelKind::Asset));
    }

    #[test]
    fn codenames_round_trip() {
        for model in ModelKind::all() {
            for verb in PermissionVerb::all() {
                for permission in [
                    Permission::Model(*verb, *model),
                    Permission::ModelAll(*verb, *model),
                ] {
                    assert_eq!(
                        Permission::from_str(permission.codename().as_str()).ok(),
                        Some(permission)
                    );
                }
            }
        }
    }
}
