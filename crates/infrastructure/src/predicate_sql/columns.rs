use fieldkit_domain::{AccessDomain, ModelKind};

/// SQL expressions reading the predicate inputs of one model.
///
/// Geography that is derived from related rows is written as a correlated
/// sub-select on `record`, so the value is never stored twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordColumns {
    pub(crate) table: &'static str,
    pub(crate) country: &'static str,
    pub(crate) area: &'static str,
    pub(crate) state: Option<&'static str>,
    pub(crate) created_by: Option<&'static str>,
    pub(crate) waiting_transfer: Option<&'static str>,
    pub(crate) mode: Option<&'static str>,
}

const ASSET_AREA: &str = "(SELECT place.acted_area_id FROM premises \
     JOIN places AS place ON place.id = premises.place_id \
     WHERE premises.id = record.current_premises_id)";

const ALLOCATED_ASSET_COUNTRY: &str =
    "(SELECT asset.country_mission_id FROM assets AS asset WHERE asset.id = record.asset_id)";

const ALLOCATED_ASSET_AREA: &str = "(SELECT place.acted_area_id FROM assets AS asset \
     JOIN premises ON premises.id = asset.current_premises_id \
     JOIN places AS place ON place.id = premises.place_id \
     WHERE asset.id = record.asset_id)";

const WAITING_TRANSFER: &str = "EXISTS (SELECT 1 \
     FROM asset_allocation_confirmations AS confirmation \
     WHERE confirmation.allocation_id = record.id \
     AND confirmation.kind = 'ASSET_TRANSFER_PREMISES' \
     AND confirmation.state = 'WAITING')";

const INVENTORY_COUNTRY: &str =
    "(SELECT premises.mission_country_id FROM premises WHERE premises.id = record.premises_id)";

const INVENTORY_AREA: &str = "(SELECT place.acted_area_id FROM premises \
     JOIN places AS place ON place.id = premises.place_id \
     WHERE premises.id = record.premises_id)";

const RELATION_COUNTRY: &str = "(SELECT premises.mission_country_id \
     FROM inventories AS inventory \
     JOIN premises ON premises.id = inventory.premises_id \
     WHERE inventory.id = record.inventory_id)";

const RELATION_AREA: &str = "(SELECT place.acted_area_id FROM inventories AS inventory \
     JOIN premises ON premises.id = inventory.premises_id \
     JOIN places AS place ON place.id = premises.place_id \
     WHERE inventory.id = record.inventory_id)";

const RELATION_STATE: &str = "(SELECT inventory.state FROM inventories AS inventory \
     WHERE inventory.id = record.inventory_id)";

const RELATION_CREATED_BY: &str = "(SELECT inventory.created_by FROM inventories AS inventory \
     WHERE inventory.id = record.inventory_id)";

const fn allocation(table: &'static str) -> RecordColumns {
    RecordColumns {
        table,
        country: ALLOCATED_ASSET_COUNTRY,
        area: ALLOCATED_ASSET_AREA,
        state: None,
        created_by: Some("record.created_by"),
        waiting_transfer: Some(WAITING_TRANSFER),
        mode: None,
    }
}

/// Column map of the grant table of `domain`.
pub(crate) const fn grant_columns(domain: AccessDomain) -> RecordColumns {
    let table = match domain {
        AccessDomain::Asset => "asset_user_accesses",
        AccessDomain::Supplier => "supplier_user_accesses",
        AccessDomain::Procurement => "procurement_user_accesses",
    };

    RecordColumns {
        table,
        country: "record.country_id",
        area: "record.area_id",
        state: None,
        created_by: None,
        waiting_transfer: None,
        mode: Some("record.mode"),
    }
}

/// Column map of the table storing `model`.
pub(crate) const fn record_columns(model: ModelKind) -> RecordColumns {
    match model {
        ModelKind::Asset => RecordColumns {
            table: "assets",
            country: "record.country_mission_id",
            area: ASSET_AREA,
            state: Some("record.state"),
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::AssetUserAccess => grant_columns(AccessDomain::Asset),
        ModelKind::SupplierUserAccess => grant_columns(AccessDomain::Supplier),
        ModelKind::ProcurementUserAccess => grant_columns(AccessDomain::Procurement),
        ModelKind::AssetAllocationProjectContract => {
            allocation("asset_allocation_project_contracts")
        }
        ModelKind::AssetAllocationPremises => allocation("asset_allocation_premises"),
        ModelKind::AssetAllocationUsage => allocation("asset_allocation_usages"),
        ModelKind::Inventory => RecordColumns {
            table: "inventories",
            country: INVENTORY_COUNTRY,
            area: INVENTORY_AREA,
            state: Some("record.state"),
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::InventoryAssetRelation => RecordColumns {
            table: "inventory_asset_relations",
            country: RELATION_COUNTRY,
            area: RELATION_AREA,
            state: Some(RELATION_STATE),
            created_by: Some(RELATION_CREATED_BY),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::DisposalPlan => RecordColumns {
            table: "disposal_plans",
            country: "record.country_mission_id",
            area: "record.acted_area_id",
            state: Some("record.state"),
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::AssetMaintenance => RecordColumns {
            table: "asset_maintenances",
            country: ALLOCATED_ASSET_COUNTRY,
            area: ALLOCATED_ASSET_AREA,
            state: Some("record.state"),
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::Supplier => RecordColumns {
            table: "suppliers",
            country: "record.country_id",
            area: "record.area_id",
            state: None,
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
        ModelKind::Procurement => RecordColumns {
            table: "procurements",
            country: "record.country_id",
            area: "NULL::uuid",
            state: None,
            created_by: Some("record.created_by"),
            waiting_transfer: None,
            mode: None,
        },
    }
}
