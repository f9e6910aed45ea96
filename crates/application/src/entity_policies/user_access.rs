use fieldkit_domain::{
    AccessDomain, AccessMode, AreaId, CountryId, ModelKind, Permission, PermissionVerb, Scope,
    UserAccessGrant,
};
use serde::{Deserialize, Serialize};

use super::{EntityAccessPolicy, Scoping};
use crate::access_context::{AccessContext, PolicyAction};
use crate::access_predicate::{AccessPredicate, RowCondition, ScopedRow};

/// Grant an actor asks to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantRequest {
    /// Target country, `None` for every country.
    pub country: Option<CountryId>,
    /// Target area, `None` for every area.
    pub area: Option<AreaId>,
    /// Requested mode.
    pub mode: AccessMode,
}

/// Access rules of grant rows themselves.
///
/// Actors see grants strictly inside their own scope: an area-scoped actor
/// never sees grants without an area. Only supervisors see other modes, and
/// controller grants stay reserved to domain administrators.
#[derive(Debug, Clone, Copy)]
pub struct UserAccessPolicy {
    domain: AccessDomain,
}

impl UserAccessPolicy {
    /// Creates the policy of one grant table.
    #[must_use]
    pub fn new(domain: AccessDomain) -> Self {
        Self { domain }
    }

    fn visible_modes(&self, grant: &UserAccessGrant, action: PolicyAction) -> Vec<AccessMode> {
        if action == PolicyAction::Read && grant.mode() == AccessMode::Officer {
            return vec![AccessMode::Officer, AccessMode::InventoryValidator];
        }
        if !grant.mode().is_supervisor() {
            return vec![grant.mode()];
        }

        self.domain
            .supported_modes()
            .iter()
            .copied()
            .filter(|mode| *mode != AccessMode::Controller)
            .collect()
    }

    /// Whether the actor may delete the grant row.
    #[must_use]
    pub fn can_delete(&self, context: &AccessContext, grant: &UserAccessGrant) -> bool {
        self.can_mutate_instance(context, grant, PolicyAction::Delete)
    }
}

impl EntityAccessPolicy for UserAccessPolicy {
    type Row = UserAccessGrant;
    type Draft = GrantRequest;

    fn model(&self) -> ModelKind {
        ModelKind::user_access_of(self.domain)
    }

    fn domain(&self) -> AccessDomain {
        self.domain
    }

    fn scoping(&self, context: &AccessContext, action: PolicyAction) -> Scoping {
        if !context.is_authenticated() {
            return Scoping::Nothing;
        }

        let blanket = match action {
            PolicyAction::Read => context.allows_all(PermissionVerb::View, self.model()),
            PolicyAction::Delete => context.allows_all(PermissionVerb::Delete, self.model()),
            PolicyAction::Edit | PolicyAction::PlayTransition => false,
        };
        if blanket {
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
        let mut terms = Vec::with_capacity(3);
        if let Scope::Exactly(area) = grant.area() {
            terms.push(AccessPredicate::condition(RowCondition::AreaEquals(area)));
        }
        terms.push(AccessPredicate::condition(match grant.country() {
            Scope::Exactly(country) => RowCondition::CountryEquals(country),
            Scope::Any => RowCondition::HasPrimaryKey,
        }));
        terms.push(AccessPredicate::condition(RowCondition::ModeIn(
            self.visible_modes(grant, action),
        )));

        AccessPredicate::all_of(terms)
    }

    fn grant_admits(
        &self,
        _context: &AccessContext,
        grant: &UserAccessGrant,
        action: PolicyAction,
        row: &UserAccessGrant,
    ) -> bool {
        let area = match grant.area() {
            Scope::Exactly(area) => row.area() == Scope::Exactly(area),
            Scope::Any => true,
        };
        let country = match grant.country() {
            Scope::Exactly(country) => row.country() == Scope::Exactly(country),
            Scope::Any => row.row_id().is_some(),
        };

        area && country && self.visible_modes(grant, action).contains(&row.mode())
    }

    /// Controller grants are reserved to blanket add holders. Other modes need
    /// a grant containing the target with the same mode or a supervisor mode.
    fn can_create(&self, context: &AccessContext, draft: &GrantRequest) -> bool {
        if !context.is_authenticated() {
            return false;
        }
        if context.has(Permission::ModelAll(PermissionVerb::Add, self.model())) {
            return true;
        }
        if draft.mode == AccessMode::Controller {
            return false;
        }

        context.grants(self.domain).any(|grant| {
            grant.area().contains(draft.area)
                && grant.country().contains(draft.country)
                && (grant.mode() == draft.mode || grant.mode().is_supervisor())
        })
    }
}

/// Operational area as listed to grant administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRef {
    /// Area identifier.
    pub id: AreaId,
    /// Country the area belongs to.
    pub country: CountryId,
    /// Inactive areas are never offered.
    pub is_active: bool,
}

/// Areas an actor may hand out grants for: areas named by one of their grants
/// and every area of a country they hold an area-unrestricted grant for.
#[must_use]
pub fn accessible_areas(
    context: &AccessContext,
    domain: AccessDomain,
    areas: &[AreaRef],
) -> Vec<AreaRef> {
    let model = ModelKind::user_access_of(domain);
    let admin = context.allows_all(PermissionVerb::View, model);

    areas
        .iter()
        .filter(|area| area.is_active)
        .filter(|area| {
            admin
                || context.grants(domain).any(|grant| match grant.area() {
                    Scope::Exactly(granted) => granted == area.id,
                    Scope::Any => grant.country().contains(Some(area.country)),
                })
        })
        .copied()
        .collect()
}
