use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use fieldkit_application::AreaRef;
use fieldkit_core::RecordId;
use fieldkit_domain::{AccessMode, AreaId, CountryId};
use uuid::Uuid;

use super::{
    accessible_areas_handler, create_user_accesses_handler, delete_user_access_handler,
    delete_user_accesses_handler, list_user_accesses_handler,
};
use crate::dto::{CreateGrantsRequest, DeleteGrantsRequest};
use crate::handlers::test_support::{json_body, seed_asset_grant, test_app};

fn create_request(mode: &str, country: Option<CountryId>) -> CreateGrantsRequest {
    CreateGrantsRequest {
        user: "bob".to_owned(),
        mode: mode.to_owned(),
        country,
        areas: Vec::new(),
    }
}

#[tokio::test]
async fn created_grants_are_listed() {
    let app = test_app().await;
    let country = CountryId::new();

    let created = create_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("asset".to_owned()),
        Json(create_request("MANAGER", Some(country))),
    )
    .await
    .into_response();
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = list_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("asset".to_owned()),
    )
    .await
    .into_response();
    assert_eq!(listed.status(), StatusCode::OK);

    let body = json_body(listed).await;
    let bob = app.bob.user_id().to_string();
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["user_id"], bob.as_str());
    assert_eq!(body[0]["mode"], "MANAGER");
    assert_eq!(body[0]["country"], country.to_string().as_str());
    assert!(body[0]["area"].is_null());
}

#[tokio::test]
async fn unknown_domain_is_rejected() {
    let app = test_app().await;

    let response = list_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("vehicle".to_owned()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_mode_names_the_field() {
    let app = test_app().await;

    let response = create_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("supplier".to_owned()),
        Json(create_request("CHIEF", None)),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["field"], "mode");
}

#[tokio::test]
async fn callers_without_permission_are_forbidden() {
    let app = test_app().await;

    let response = list_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.bob.clone()),
        Path("asset".to_owned()),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn batch_deletion_reports_the_deleted_count() {
    let app = test_app().await;
    let Some(grant) =
        seed_asset_grant(&app.access, app.bob.user_id(), None, AccessMode::Officer).await
    else {
        panic!("grant should be stored");
    };

    let response = delete_user_accesses_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("asset".to_owned()),
        Json(DeleteGrantsRequest {
            ids: vec![grant.id(), RecordId::new()],
        }),
    )
    .await
    .into_response();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["num_deleted"], 1);
    assert_eq!(app.access.audit_events().await.len(), 2);
}

#[tokio::test]
async fn single_deletion_answers_no_content_then_not_found() {
    let app = test_app().await;
    let Some(grant) =
        seed_asset_grant(&app.access, app.bob.user_id(), None, AccessMode::Manager).await
    else {
        panic!("grant should be stored");
    };
    let delete = |grant_id: Uuid| {
        delete_user_access_handler(
            State(app.state.clone()),
            Extension(app.alice.clone()),
            Path(("asset".to_owned(), grant_id)),
        )
    };

    let first = delete(grant.id().as_uuid()).await.into_response();
    let second = delete(grant.id().as_uuid()).await.into_response();

    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn accessible_areas_skip_inactive_areas() {
    let app = test_app().await;
    let country = CountryId::new();
    let active = AreaRef {
        id: AreaId::new(),
        country,
        is_active: true,
    };
    app.access.add_area(active).await;
    app.access
        .add_area(AreaRef {
            id: AreaId::new(),
            country,
            is_active: false,
        })
        .await;

    let response = accessible_areas_handler(
        State(app.state.clone()),
        Extension(app.alice.clone()),
        Path("asset".to_owned()),
    )
    .await
    .into_response();

    let body = json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["id"], active.id.to_string().as_str());
}
