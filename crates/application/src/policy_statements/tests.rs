use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use fieldkit_core::{AppError, RecordId, UserId};
use fieldkit_domain::{
    AccessDomain, AccessMode, AssetState, CountryId, DisposalPlan, DisposalPlanState, Geography,
    Inventory, InventoryAssetRelation, InventoryState, ModelKind, Permission, PermissionVerb,
};

use super::{
    ActionTarget, ApiAction, PolicyStatements, StatementCondition, asset_statements,
    disposal_plan_statements, inventory_asset_relation_statements, user_access_statements,
};
use crate::access_context::AccessContext;
use crate::entity_policies::{DisposalPlanDraft, GrantRequest};
use crate::test_support::{
    ALL_VERBS, asset, asset_grant, context, model_permissions, premises,
};

type Statements = PolicyStatements<(), ()>;

fn view(model: ModelKind) -> Permission {
    Permission::Model(PermissionVerb::View, model)
}

#[test]
fn uncovered_action_is_denied() {
    let statements = Statements::new(ModelKind::Asset).allow(
        &[ApiAction::List],
        vec![StatementCondition::HasPermission(view(ModelKind::Asset))],
    );
    let caller = context(UserId::new(), vec![view(ModelKind::Asset)], Vec::new());

    assert!(statements.covers(ApiAction::List));
    assert!(!statements.covers(ApiAction::Export));
    assert!(statements.is_allowed(&caller, ApiAction::List, ActionTarget::Collection));
    assert!(!statements.is_allowed(&caller, ApiAction::Export, ActionTarget::Collection));
}

#[test]
fn anonymous_caller_is_unauthorized() {
    let statements = Statements::new(ModelKind::Asset).allow(&[ApiAction::List], Vec::new());

    let result = statements.authorize(
        &AccessContext::anonymous(),
        ApiAction::List,
        ActionTarget::Collection,
    );
    assert!(matches!(result, Err(AppError::Unauthorized(_))));
}

#[test]
fn denial_does_not_name_the_failing_rule() {
    let statements = Statements::new(ModelKind::Asset).allow(
        &[ApiAction::List],
        vec![StatementCondition::HasPermission(view(ModelKind::Asset))],
    );
    let caller = context(UserId::new(), Vec::new(), Vec::new());

    let result = statements.authorize(&caller, ApiAction::List, ActionTarget::Collection);
    assert!(matches!(
        result,
        Err(AppError::Forbidden(ref message)) if message == "permission denied"
    ));
}

#[test]
fn conditions_short_circuit_in_order() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&calls);
    let statements = Statements::new(ModelKind::Asset).allow(
        &[ApiAction::Update],
        vec![
            StatementCondition::HasPermission(Permission::Model(
                PermissionVerb::Change,
                ModelKind::Asset,
            )),
            StatementCondition::check("counted", move |_, _| {
                counted.fetch_add(1, Ordering::SeqCst);
                true
            }),
        ],
    );
    let without = context(UserId::new(), Vec::new(), Vec::new());
    let with = context(
        UserId::new(),
        vec![Permission::Model(PermissionVerb::Change, ModelKind::Asset)],
        Vec::new(),
    );

    assert!(!statements.is_allowed(&without, ApiAction::Update, ActionTarget::Collection));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(statements.is_allowed(&with, ApiAction::Update, ActionTarget::Collection));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn any_passing_statement_allows() {
    let statements = Statements::new(ModelKind::Asset)
        .allow(
            &[ApiAction::Retrieve],
            vec![StatementCondition::check("never", |_, _| false)],
        )
        .allow(
            &[ApiAction::Retrieve],
            vec![StatementCondition::check("always", |_, _| true)],
        );
    let caller = context(UserId::new(), Vec::new(), Vec::new());

    assert!(statements.is_allowed(&caller, ApiAction::Retrieve, ActionTarget::Collection));
}

#[test]
fn action_names_parse_back() {
    for name in ["list", "partial_update", "make_donation_certificate", "delete_many"] {
        let action = ApiAction::from_str(name);
        assert!(matches!(action, Ok(action) if action.as_str() == name));
    }
    assert!(ApiAction::from_str("launch").is_err());
}

#[test]
fn asset_update_relies_on_the_instance_check() {
    let user_id = UserId::new();
    let country = CountryId::new();
    let caller = context(
        user_id,
        model_permissions(ModelKind::Asset, ALL_VERBS),
        vec![asset_grant(user_id, Some(country), None, AccessMode::Officer)],
    );
    let purchase_clerk = context(
        UserId::new(),
        vec![Permission::ChangeAssetPurchaseNumber],
        Vec::new(),
    );
    let statements = asset_statements();
    let inside = asset(AssetState::InStock, Some(country), None);
    let outside = asset(AssetState::InStock, Some(CountryId::new()), None);

    assert!(statements.is_allowed(&caller, ApiAction::Update, ActionTarget::Instance(&inside)));
    assert!(!statements.is_allowed(
        &caller,
        ApiAction::Update,
        ActionTarget::Instance(&outside)
    ));
    assert!(statements.is_allowed(
        &purchase_clerk,
        ApiAction::PartialUpdate,
        ActionTarget::Instance(&outside)
    ));
    assert!(!statements.is_allowed(&purchase_clerk, ApiAction::List, ActionTarget::Collection));
    assert!(statements.is_allowed(
        &caller,
        ApiAction::Create,
        ActionTarget::Creation(&Geography::country_only(Some(country)))
    ));
}

#[test]
fn disposal_plan_destroy_needs_permission_and_draft_state() {
    let user_id = UserId::new();
    let mut permissions = model_permissions(ModelKind::DisposalPlan, ALL_VERBS);
    let grants = vec![asset_grant(user_id, None, None, AccessMode::Manager)];
    let caller = context(user_id, permissions.clone(), grants.clone());
    permissions.retain(|permission| {
        *permission != Permission::Model(PermissionVerb::Delete, ModelKind::DisposalPlan)
    });
    let no_delete = context(user_id, permissions, grants);
    let statements = disposal_plan_statements();
    let plan = |state| DisposalPlan {
        id: RecordId::new(),
        state,
        country_mission: None,
        acted_area: None,
        asset_ids: Vec::new(),
        created_by: None,
    };
    let draft = plan(DisposalPlanState::Draft);
    let done = plan(DisposalPlanState::Done);

    let destroy = |caller: &AccessContext, plan: &DisposalPlan| {
        statements.is_allowed(caller, ApiAction::Destroy, ActionTarget::Instance(plan))
    };

    assert!(destroy(&caller, &draft));
    assert!(!destroy(&caller, &done));
    assert!(!destroy(&no_delete, &draft));
    assert!(!statements.is_allowed(
        &caller,
        ApiAction::Create,
        ActionTarget::Creation(&DisposalPlanDraft::default())
    ));
}

#[test]
fn grant_batch_endpoints_only_carry_the_coarse_gate() {
    let user_id = UserId::new();
    let model = ModelKind::user_access_of(AccessDomain::Asset);
    let caller = context(user_id, model_permissions(model, ALL_VERBS), Vec::new());
    let statements = user_access_statements(AccessDomain::Asset);
    let request = GrantRequest {
        country: None,
        area: None,
        mode: AccessMode::Officer,
    };

    assert!(statements.is_allowed(&caller, ApiAction::CreateMany, ActionTarget::Collection));
    assert!(statements.is_allowed(&caller, ApiAction::DeleteMany, ActionTarget::Collection));
    assert!(!statements.is_allowed(
        &caller,
        ApiAction::Create,
        ActionTarget::Creation(&request)
    ));
    assert!(!statements.covers(ApiAction::Update));
}

#[test]
fn inventory_lines_are_removed_through_inventory_edit_rights() {
    let user_id = UserId::new();
    let country = CountryId::new();
    let caller = context(
        user_id,
        model_permissions(ModelKind::Inventory, ALL_VERBS),
        vec![asset_grant(user_id, Some(country), None, AccessMode::Officer)],
    );
    let line = |state| InventoryAssetRelation {
        id: RecordId::new(),
        inventory: Inventory {
            id: RecordId::new(),
            state,
            premises: Some(premises(Some(country), None)),
            created_by: None,
        },
        asset_id: RecordId::new(),
    };
    let statements = inventory_asset_relation_statements();
    let on_going = line(InventoryState::OnGoing);
    let submitted = line(InventoryState::Submitted);

    assert!(statements.is_allowed(&caller, ApiAction::Destroy, ActionTarget::Instance(&on_going)));
    assert!(!statements.is_allowed(
        &caller,
        ApiAction::Destroy,
        ActionTarget::Instance(&submitted)
    ));
    assert!(!statements.is_allowed(&caller, ApiAction::Destroy, ActionTarget::Collection));
}
