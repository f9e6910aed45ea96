use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use fieldkit_application::{
    AllocationPolicy, AssetPolicy, DisposalPlanPolicy, InventoryAssetRelationPolicy,
    InventoryPolicy, MaintenancePolicy, ProcurementPolicy, SupplierPolicy, UserAccessPolicy,
};
use fieldkit_core::{RecordId, UserIdentity};
use fieldkit_domain::{AccessDomain, AllocationKind, ModelKind};
use uuid::Uuid;

use crate::dto::{ScopeQuery, ScopedRecordsResponse};
use crate::error::ApiResult;
use crate::state::AppState;


/// Binds `$policy` to the access policy of `$model` and evaluates `$body`.
macro_rules! with_policy {
    ($model:expr, $policy:ident => $body:expr) => {
        match $model {
            ModelKind::Asset => {
                let $policy = AssetPolicy;
                $body
            }
            ModelKind::AssetUserAccess => {
                let $policy = UserAccessPolicy::new(AccessDomain::Asset);
                $body
            }
            ModelKind::SupplierUserAccess => {
                let $policy = UserAccessPolicy::new(AccessDomain::Supplier);
                $body
            }
            ModelKind::ProcurementUserAccess => {
                let $policy = UserAccessPolicy::new(AccessDomain::Procurement);
                $body
            }
            ModelKind::AssetAllocationProjectContract => {
                let $policy = AllocationPolicy::new(AllocationKind::ProjectContract);
                $body
            }
            ModelKind::AssetAllocationPremises => {
                let $policy = AllocationPolicy::new(AllocationKind::Premises);
                $body
            }
            ModelKind::AssetAllocationUsage => {
                let $policy = AllocationPolicy::new(AllocationKind::Usage);
                $body
            }
            ModelKind::Inventory => {
                let $policy = InventoryPolicy;
                $body
            }
            ModelKind::InventoryAssetRelation => {
                let $policy = InventoryAssetRelationPolicy::default();
                $body
            }
            ModelKind::DisposalPlan => {
                let $policy = DisposalPlanPolicy::default();
                $body
            }
            ModelKind::AssetMaintenance => {
                let $policy = MaintenancePolicy;
                $body
            }
            ModelKind::Supplier => {
                let $policy = SupplierPolicy;
                $body
            }
            ModelKind::Procurement => {
                let $policy = ProcurementPolicy;
                $body
            }
        }
    };
}

pub async fn list_scoped_records_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(model): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<Json<ScopedRecordsResponse>> {
    let model = ModelKind::from_str(model.as_str())?;
    let action = query.action();
    let service = &state.access_control_service;

    let ids = with_policy!(model, policy => {
        service.list_scoped_ids(Some(&user), &policy, action).await?
    });

    Ok(Json(ScopedRecordsResponse::new(model, action, ids)))
}

pub async fn check_scoped_record_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((model, record_id)): Path<(String, Uuid)>,
    Query(query): Query<ScopeQuery>,
) -> ApiResult<StatusCode> {
    let model = ModelKind::from_str(model.as_str())?;
    let record_id = RecordId::from_uuid(record_id);
    let service = &state.access_control_service;

    with_policy!(model, policy => {
        service
            .require_scoped_record(Some(&user), &policy, record_id, query.action())
            .await?
    });

    Ok(StatusCode::NO_CONTENT)
}
