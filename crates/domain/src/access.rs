use std::str::FromStr;

use fieldkit_core::{AppError, AppResult, RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::geography::{AreaId, CountryId, Geography, Scope};

/// Business domain a grant table belongs to.
///
/// Grant tables are structurally parallel but a grant in one domain never
/// authorizes anything in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessDomain {
    /// Assets and everything attached to them.
    Asset,
    /// Supplier registry.
    Supplier,
    /// Procurement requests.
    Procurement,
}

impl AccessDomain {
    /// Returns a stable storage value for this domain.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Supplier => "supplier",
            Self::Procurement => "procurement",
        }
    }

    /// Returns all known domains.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessDomain] = &[
            AccessDomain::Asset,
            AccessDomain::Supplier,
            AccessDomain::Procurement,
        ];

        ALL
    }

    /// Modes a grant in this domain may carry.
    #[must_use]
    pub fn supported_modes(&self) -> &'static [AccessMode] {
        match self {
            Self::Asset => AccessMode::all(),
            Self::Supplier | Self::Procurement => &[
                AccessMode::Officer,
                AccessMode::Manager,
                AccessMode::Controller,
            ],
        }
    }

    /// Whether grants in this domain can be narrowed to an area.
    #[must_use]
    pub fn has_area_axis(&self) -> bool {
        !matches!(self, Self::Procurement)
    }

    /// Rejects modes the domain does not know about.
    pub fn ensure_mode_supported(&self, mode: AccessMode) -> AppResult<()> {
        if self.supported_modes().contains(&mode) {
            return Ok(());
        }

        Err(AppError::invalid_field(
            "mode",
            format!(
                "mode '{}' is not available for {} accesses",
                mode.as_str(),
                self.as_str()
            ),
        ))
    }
}

impl FromStr for AccessDomain {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "asset" => Ok(Self::Asset),
            "supplier" => Ok(Self::Supplier),
            "procurement" => Ok(Self::Procurement),
            _ => Err(AppError::Validation(format!(
                "unknown access domain '{value}'"
            ))),
        }
    }
}

/// Role carried by a grant inside its geographic scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccessMode {
    /// Day to day operator.
    Officer,
    /// Supervises officers in the scope.
    Manager,
    /// Highest role, only assignable by domain administrators.
    Controller,
    /// Reviews submitted inventories.
    InventoryValidator,
    /// Reviews disposal plans under finance validation.
    DisposalValidator,
}

impl AccessMode {
    /// Returns a stable storage value for this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Officer => "OFFICER",
            Self::Manager => "MANAGER",
            Self::Controller => "CONTROLLER",
            Self::InventoryValidator => "INVENTORY_VALIDATOR",
            Self::DisposalValidator => "DISPOSAL_VALIDATOR",
        }
    }

    /// Returns all known modes.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[AccessMode] = &[
            AccessMode::Officer,
            AccessMode::Manager,
            AccessMode::Controller,
            AccessMode::InventoryValidator,
            AccessMode::DisposalValidator,
        ];

        ALL
    }

    /// Managers and controllers supervise every other mode.
    #[must_use]
    pub fn is_supervisor(&self) -> bool {
        matches!(self, Self::Manager | Self::Controller)
    }

    /// Officer, manager or controller.
    #[must_use]
    pub fn is_operator(&self) -> bool {
        matches!(self, Self::Officer | Self::Manager | Self::Controller)
    }

    /// Inventory or disposal validator.
    #[must_use]
    pub fn is_validator(&self) -> bool {
        matches!(self, Self::InventoryValidator | Self::DisposalValidator)
    }
}

impl FromStr for AccessMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "OFFICER" => Ok(Self::Officer),
            "MANAGER" => Ok(Self::Manager),
            "CONTROLLER" => Ok(Self::Controller),
            "INVENTORY_VALIDATOR" => Ok(Self::InventoryValidator),
            "DISPOSAL_VALIDATOR" => Ok(Self::DisposalValidator),
            _ => Err(AppError::invalid_field(
                "mode",
                format!("unknown access mode '{value}'"),
            )),
        }
    }
}

/// Persisted authorization of one user inside a geographic scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccessGrant {
    id: RecordId,
    domain: AccessDomain,
    user_id: UserId,
    country: Scope<CountryId>,
    area: Scope<AreaId>,
    mode: AccessMode,
}

impl UserAccessGrant {
    /// Creates a grant, normalising the area axis for domains without one.
    #[must_use]
    pub fn new(
        id: RecordId,
        domain: AccessDomain,
        user_id: UserId,
        country: Scope<CountryId>,
        area: Scope<AreaId>,
        mode: AccessMode,
    ) -> Self {
        let area = if domain.has_area_axis() {
            area
        } else {
            Scope::Any
        };

        Self {
            id,
            domain,
            user_id,
            country,
            area,
            mode,
        }
    }

    /// Returns the grant identifier.
    #[must_use]
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the grant table this grant lives in.
    #[must_use]
    pub fn domain(&self) -> AccessDomain {
        self.domain
    }

    /// Returns the grantee.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the country restriction.
    #[must_use]
    pub fn country(&self) -> Scope<CountryId> {
        self.country
    }

    /// Returns the area restriction.
    #[must_use]
    pub fn area(&self) -> Scope<AreaId> {
        self.area
    }

    /// Returns the role carried by the grant.
    #[must_use]
    pub fn mode(&self) -> AccessMode {
        self.mode
    }

    /// Natural key used for upserts.
    #[must_use]
    pub fn natural_key(&self) -> (UserId, Option<CountryId>, Option<AreaId>) {
        (self.user_id, self.country.value(), self.area.value())
    }

    /// Replaces the mode, the only mutable attribute of a grant.
    pub fn set_mode(&mut self, mode: AccessMode) {
        self.mode = mode;
    }

    /// Whether the grant applies to an entity located at `geography`,
    /// treating unscoped grants as wildcards and unknown entity axes as
    /// matching only wildcards.
    #[must_use]
    pub fn applies_to(&self, geography: Geography) -> bool {
        self.country.contains(geography.country) && self.area.contains(geography.area)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use fieldkit_core::{RecordId, UserId};

    use super::{AccessDomain, AccessMode, UserAccessGrant};
    use crate::geography::{AreaId, CountryId, Geography, Scope};

    #[test]
    fn mode_round_trips_storage_values() {
        for mode in AccessMode::all() {
            assert_eq!(AccessMode::from_str(mode.as_str()).ok(), Some(*mode));
        }
    }

    #[test]
    fn procurement_grants_drop_the_area_axis() {
        let grant = UserAccessGrant::new(
            RecordId::new(),
            AccessDomain::Procurement,
            UserId::new(),
            Scope::Exactly(CountryId::new()),
            Scope::Exactly(AreaId::new()),
            AccessMode::Officer,
        );
        assert!(grant.area().is_any());
    }

    #[test]
    fn supplier_rejects_validator_modes() {
        assert!(
            AccessDomain::Supplier
                .ensure_mode_supported(AccessMode::InventoryValidator)
                .is_err()
        );
        assert!(
            AccessDomain::Asset
                .ensure_mode_supported(AccessMode::DisposalValidator)
                .is_ok()
        );
    }

    #[test]
    fn scoped_grant_does_not_apply_to_entity_without_area() {
        let country = CountryId::new();
        let grant = UserAccessGrant::new(
            RecordId::new(),
            AccessDomain::Asset,
            UserId::new(),
            Scope::Exactly(country),
            Scope::Exactly(AreaId::new()),
            AccessMode::Manager,
        );
        assert!(!grant.applies_to(Geography::new(Some(country), None)));
    }
}
