use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::geography::{Geography, Premises};

named_vocabulary! {
    /// Lifecycle state of an inventory.
    InventoryState {
        /// Counting in progress.
        OnGoing => "ON_GOING",
        /// Waiting for a validator.
        Submitted => "SUBMITTED",
        /// Closed, read-only.
        Validated => "VALIDATED",
    }
}

named_vocabulary! {
    /// Workflow transition of an inventory.
    InventoryTransition {
        /// Officer hands the count over.
        Submit => "SUBMIT",
        /// Validator sends the count back.
        ToCorrect => "TO_CORRECT",
        /// Validator closes the inventory.
        Validate => "VALIDATE",
    }
}

/// Periodic count of the assets in one premises.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Primary key.
    pub id: RecordId,
    /// Current lifecycle state.
    pub state: InventoryState,
    /// Counted premises.
    pub premises: Option<Premises>,
    /// Author of the inventory.
    pub created_by: Option<UserId>,
}

impl Inventory {
    /// Country of the premises and area of its place.
    #[must_use]
    pub fn geography(&self) -> Geography {
        match &self.premises {
            Some(premises) => Geography::new(premises.mission_country, premises.acted_area()),
            None => Geography::default(),
        }
    }
}

/// One asset counted in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryAssetRelation {
    /// Primary key.
    pub id: RecordId,
    /// Owning inventory, which carries the access rules.
    pub inventory: Inventory,
    /// Counted asset.
    pub asset_id: RecordId,
}
