use fieldkit_core::{RecordId, UserId};
use fieldkit_domain::{
    AccessMode, Asset, AssetAllocation, AssetMaintenance, DisposalPlan, Geography, Inventory,
    InventoryAssetRelation, Procurement, Supplier, UserAccessGrant,
};

use super::ScopedRow;

impl ScopedRow for Asset {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        Asset::geography(self)
    }

    fn state_name(&self) -> Option<&'static str> {
        Some(self.state.as_str())
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl ScopedRow for AssetAllocation {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        AssetAllocation::geography(self)
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }

    fn has_waiting_transfer(&self) -> bool {
        AssetAllocation::has_waiting_transfer(self)
    }
}

impl ScopedRow for Inventory {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        Inventory::geography(self)
    }

    fn state_name(&self) -> Option<&'static str> {
        Some(self.state.as_str())
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

// Relations are scoped through their inventory.
impl ScopedRow for InventoryAssetRelation {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        self.inventory.geography()
    }

    fn state_name(&self) -> Option<&'static str> {
        Some(self.inventory.state.as_str())
    }

    fn created_by(&self) -> Option<UserId> {
        self.inventory.created_by
    }
}

impl ScopedRow for DisposalPlan {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        DisposalPlan::geography(self)
    }

    fn state_name(&self) -> Option<&'static str> {
        Some(self.state.as_str())
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl ScopedRow for AssetMaintenance {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        AssetMaintenance::geography(self)
    }

    fn state_name(&self) -> Option<&'static str> {
        Some(self.state.as_str())
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl ScopedRow for Supplier {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        Supplier::geography(self)
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl ScopedRow for Procurement {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id)
    }

    fn geography(&self) -> Geography {
        Procurement::geography(self)
    }

    fn created_by(&self) -> Option<UserId> {
        self.created_by
    }
}

impl ScopedRow for UserAccessGrant {
    fn row_id(&self) -> Option<RecordId> {
        Some(self.id())
    }

    fn geography(&self) -> Geography {
        Geography::new(self.country().value(), self.area().value())
    }

    fn grant_mode(&self) -> Option<AccessMode> {
        Some(self.mode())
    }
}
