use fieldkit_application::{AccessPredicate, RowCondition};
use fieldkit_core::UserId;
use fieldkit_domain::{AccessDomain, AccessMode, AreaId, AssetState, CountryId, ModelKind};
use sqlx::{Postgres, QueryBuilder};

use super::{grant_columns, push_predicate, record_columns};

fn render(model: ModelKind, predicate: &AccessPredicate) -> String {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    push_predicate(&mut builder, &record_columns(model), predicate);
    builder.sql().to_owned()
}

fn condition(condition: RowCondition) -> AccessPredicate {
    AccessPredicate::Condition(condition)
}

#[test]
fn constants_render_as_boolean_literals() {
    assert_eq!(render(ModelKind::Asset, &AccessPredicate::All), "TRUE");
    assert_eq!(render(ModelKind::Asset, &AccessPredicate::Nothing), "FALSE");
    assert_eq!(render(ModelKind::Asset, &AccessPredicate::And(Vec::new())), "TRUE");
    assert_eq!(render(ModelKind::Asset, &AccessPredicate::Or(Vec::new())), "FALSE");
}

#[test]
fn per_grant_clauses_render_as_a_disjunction() {
    let predicate = AccessPredicate::Or(vec![
        AccessPredicate::And(vec![
            condition(RowCondition::StateIs(AssetState::InStock.as_str())),
            condition(RowCondition::CountryCovered(CountryId::new())),
        ]),
        condition(RowCondition::HasPrimaryKey),
    ]);

    assert_eq!(
        render(ModelKind::Asset, &predicate),
        "((record.state = $1 AND (record.country_mission_id IS NULL \
         OR record.country_mission_id = $2)) OR record.id IS NOT NULL)"
    );
}

#[test]
fn derived_area_is_read_through_a_correlated_subselect() {
    let sql = render(ModelKind::Asset, &condition(RowCondition::AreaEquals(AreaId::new())));

    assert!(sql.starts_with("(SELECT place.acted_area_id FROM premises"));
    assert!(sql.contains("WHERE premises.id = record.current_premises_id)"));
    assert!(sql.ends_with(" = $1"));
}

#[test]
fn relations_follow_their_inventory() {
    let sql = render(
        ModelKind::InventoryAssetRelation,
        &AccessPredicate::And(vec![
            condition(RowCondition::StateIsNot("VALIDATED")),
            condition(RowCondition::CountryEquals(CountryId::new())),
        ]),
    );

    assert!(sql.starts_with("((SELECT inventory.state FROM inventories AS inventory"));
    assert!(sql.contains("IS DISTINCT FROM $1"));
    assert!(sql.contains("WHERE inventory.id = record.inventory_id) = $2"));
}

#[test]
fn missing_columns_fall_back_to_the_in_memory_answer() {
    assert_eq!(
        render(ModelKind::Supplier, &condition(RowCondition::StateIs("DONE"))),
        "FALSE"
    );
    assert_eq!(
        render(ModelKind::Supplier, &condition(RowCondition::StateIsNot("DONE"))),
        "TRUE"
    );
    assert_eq!(
        render(ModelKind::Asset, &condition(RowCondition::WaitingTransferConfirmation)),
        "FALSE"
    );
    assert_eq!(
        render(
            ModelKind::Asset,
            &condition(RowCondition::ModeIn(vec![AccessMode::Officer]))
        ),
        "FALSE"
    );
    assert_eq!(
        render(
            ModelKind::Procurement,
            &condition(RowCondition::AreaCovered(AreaId::new()))
        ),
        "(NULL::uuid IS NULL OR NULL::uuid = $1)"
    );
}

#[test]
fn allocations_check_pending_transfer_confirmations() {
    let sql = render(
        ModelKind::AssetAllocationPremises,
        &AccessPredicate::And(vec![
            condition(RowCondition::WaitingTransferConfirmation),
            condition(RowCondition::CreatedBy(UserId::new())),
        ]),
    );

    assert!(sql.starts_with("(EXISTS (SELECT 1"));
    assert!(sql.contains("confirmation.state = 'WAITING')"));
    assert!(sql.ends_with("AND record.created_by = $1)"));
}

#[test]
fn grant_modes_bind_one_array() {
    let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("");
    let columns = grant_columns(AccessDomain::Supplier);
    push_predicate(
        &mut builder,
        &columns,
        &AccessPredicate::And(vec![
            condition(RowCondition::CountryEquals(CountryId::new())),
            condition(RowCondition::ModeIn(vec![
                AccessMode::Officer,
                AccessMode::Manager,
            ])),
        ]),
    );

    assert_eq!(columns.table, "supplier_user_accesses");
    assert_eq!(
        builder.sql(),
        "(record.country_id = $1 AND record.mode = ANY($2))"
    );
}
