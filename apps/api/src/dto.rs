use fieldkit_application::{AreaRef, CreateGrantsInput, PolicyAction};
use fieldkit_core::RecordId;
use fieldkit_domain::{AreaId, CountryId, ModelKind, UserAccessGrant};
use serde::{Deserialize, Serialize};

/// API representation of one grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantResponse {
    pub id: RecordId,
    pub domain: &'static str,
    pub user_id: String,
    pub country: Option<CountryId>,
    pub area: Option<AreaId>,
    pub mode: &'static str,
}

impl From<UserAccessGrant> for GrantResponse {
    fn from(grant: UserAccessGrant) -> Self {
        Self {
            id: grant.id(),
            domain: grant.domain().as_str(),
            user_id: grant.user_id().to_string(),
            country: grant.country().value(),
            area: grant.area().value(),
            mode: grant.mode().as_str(),
        }
    }
}

/// Incoming payload for batch grant creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGrantsRequest {
    pub user: String,
    pub mode: String,
    #[serde(default)]
    pub country: Option<CountryId>,
    #[serde(default)]
    pub areas: Vec<AreaId>,
}

impl From<CreateGrantsRequest> for CreateGrantsInput {
    fn from(request: CreateGrantsRequest) -> Self {
        Self {
            username: request.user,
            mode: request.mode,
            country: request.country,
            areas: request.areas,
        }
    }
}

/// Incoming payload for batch grant deletion.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteGrantsRequest {
    pub ids: Vec<RecordId>,
}

/// Number of grants removed by a batch deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteGrantsResponse {
    pub num_deleted: u64,
}

/// Area offered to grant administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AreaResponse {
    pub id: AreaId,
    pub country: CountryId,
}

impl From<AreaRef> for AreaResponse {
    fn from(area: AreaRef) -> Self {
        Self {
            id: area.id,
            country: area.country,
        }
    }
}

/// Query string of scoped record probes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScopeQuery {
    pub action: Option<PolicyAction>,
}

impl ScopeQuery {
    pub fn action(&self) -> PolicyAction {
        self.action.unwrap_or(PolicyAction::Read)
    }
}

/// Identifiers of the rows inside the caller scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopedRecordsResponse {
    pub model: &'static str,
    pub action: PolicyAction,
    pub ids: Vec<RecordId>,
}

impl ScopedRecordsResponse {
    pub fn new(model: ModelKind, action: PolicyAction, ids: Vec<RecordId>) -> Self {
        Self {
            model: model.as_str(),
            action,
            ids,
        }
    }
}

/// Liveness payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
