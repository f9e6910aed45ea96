use std::str::FromStr;

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use fieldkit_core::{AppError, RecordId, UserIdentity};
use fieldkit_domain::AccessDomain;
use uuid::Uuid;

use crate::dto::{
    AreaResponse, CreateGrantsRequest, DeleteGrantsRequest, DeleteGrantsResponse, GrantResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

#[cfg(test)]
mod tests;

pub async fn list_user_accesses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(domain): Path<String>,
) -> ApiResult<Json<Vec<GrantResponse>>> {
    let domain = AccessDomain::from_str(domain.as_str())?;
    let grants = state
        .user_access_service
        .list_grants(&user, domain)
        .await?
        .into_iter()
        .map(GrantResponse::from)
        .collect();

    Ok(Json(grants))
}

pub async fn create_user_accesses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(domain): Path<String>,
    Json(payload): Json<CreateGrantsRequest>,
) -> ApiResult<(StatusCode, Json<Vec<GrantResponse>>)> {
    let domain = AccessDomain::from_str(domain.as_str())?;
    let grants = state
        .user_access_service
        .create_many(&user, domain, payload.into())
        .await?
        .into_iter()
        .map(GrantResponse::from)
        .collect();

    Ok((StatusCode::CREATED, Json(grants)))
}

pub async fn delete_user_accesses_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(domain): Path<String>,
    Json(payload): Json<DeleteGrantsRequest>,
) -> ApiResult<Json<DeleteGrantsResponse>> {
    let domain = AccessDomain::from_str(domain.as_str())?;
    let num_deleted = state
        .user_access_service
        .delete_many(&user, domain, &payload.ids)
        .await?;

    Ok(Json(DeleteGrantsResponse { num_deleted }))
}

pub async fn delete_user_access_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path((domain, grant_id)): Path<(String, Uuid)>,
) -> ApiResult<StatusCode> {
    let domain = AccessDomain::from_str(domain.as_str())?;
    let grant_id = RecordId::from_uuid(grant_id);
    let deleted = state
        .user_access_service
        .delete_grant(&user, domain, grant_id)
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!(
            "{} access '{grant_id}' does not exist",
            domain.as_str()
        ))
        .into());
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn accessible_areas_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(domain): Path<String>,
) -> ApiResult<Json<Vec<AreaResponse>>> {
    let domain = AccessDomain::from_str(domain.as_str())?;
    let areas = state
        .user_access_service
        .accessible_areas(&user, domain)
        .await?
        .into_iter()
        .map(AreaResponse::from)
        .collect();

    Ok(Json(areas))
}
