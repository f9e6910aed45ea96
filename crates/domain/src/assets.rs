use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::geography::{CountryId, Geography, Premises};

named_vocabulary! {
    /// Lifecycle state of an asset.
    AssetState {
        /// Stored and available.
        InStock => "IN_STOCK",
        /// Assignment waiting for the recipient.
        PendingAssignment => "PENDING_ASSIGNMENT",
        /// Assigned to staff or a project.
        Assigned => "ASSIGNED",
        /// Return waiting for the stock keeper.
        PendingUnassignment => "PENDING_UNASSIGNMENT",
        /// Under preventive maintenance.
        InMaintenance => "IN_MAINTENANCE",
        /// Under repair.
        InRepair => "IN_REPAIR",
        /// Part of a disposal plan.
        PendingDisposal => "PENDING_DISPOSAL",
        /// Disposed of.
        Disposed => "DISPOSED",
    }
}

named_vocabulary! {
    /// Workflow transition of an asset.
    AssetTransition {
        /// Start an assignment.
        Assign => "ASSIGN",
        /// Recipient accepts the assignment.
        AcceptAssign => "ACCEPT_ASSIGN",
        /// Recipient rejects the assignment.
        Reject => "REJECT",
        /// Start returning the asset.
        Unassign => "UNASSIGN",
        /// Stock keeper accepts the return.
        AcceptUnassign => "ACCEPT_UNASSIGN",
        /// Send to maintenance.
        SendMaintenance => "SEND_MAINTENANCE",
        /// Back from maintenance.
        EndMaintenanceToStock => "END_MAINTENANCE_TO_STOCK",
        /// Send to repair.
        SendRepair => "SEND_REPAIR",
        /// Back from repair.
        EndRepairToStock => "END_REPAIR_TO_STOCK",
        /// Attach to a disposal plan.
        StartDisposal => "START_DISPOSAL",
        /// Detach from a disposal plan.
        CancelDisposal => "CANCEL_DISPOSAL",
        /// Final disposal, driven by the disposal plan.
        Dispose => "DISPOSE",
    }
}

/// Asset row with the relations needed to locate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Primary key.
    pub id: RecordId,
    /// Current lifecycle state.
    pub state: AssetState,
    /// Country mission owning the asset.
    pub country_mission: Option<CountryId>,
    /// Premises the asset currently sits in.
    pub current_premises: Option<Premises>,
    /// Finance reference, editable on its own by finance staff.
    pub purchase_number: Option<String>,
    /// Author of the row.
    pub created_by: Option<UserId>,
}

impl Asset {
    /// Fields exposed by asset forms.
    pub const FIELDS: &'static [&'static str] = &[
        "code",
        "name",
        "category",
        "serial_number",
        "country_mission",
        "current_premises",
        "department",
        "currency",
        "purchase_price",
        "purchase_date",
        "purchase_number",
        "warranty_end_date",
        "comments",
    ];

    /// The only field writable through the purchase number permission.
    pub const PURCHASE_NUMBER_FIELD: &'static str = "purchase_number";

    /// Country and area, the area being reached through premises and place.
    #[must_use]
    pub fn geography(&self) -> Geography {
        Geography::new(
            self.country_mission,
            self.current_premises
                .as_ref()
                .and_then(Premises::acted_area),
        )
    }
}
