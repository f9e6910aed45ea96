use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::geography::Geography;

named_vocabulary! {
    /// Lifecycle state of a maintenance record.
    MaintenanceState {
        /// Scheduled.
        Planned => "PLANNED",
        /// Work started.
        InProgress => "IN_PROGRESS",
        /// Work finished, record closed.
        Done => "DONE",
    }
}

named_vocabulary! {
    /// Workflow transition of a maintenance record.
    MaintenanceTransition {
        /// Work starts.
        Start => "START",
        /// Work ends.
        Complete => "COMPLETE",
        /// Back to planning.
        Reschedule => "RESCHEDULE",
    }
}

named_vocabulary! {
    /// Classification of a maintenance record, fixed once persisted.
    MaintenanceType {
        /// Scheduled servicing.
        Preventive => "PREVENTIVE",
        /// Repair after a failure.
        Corrective => "CORRECTIVE",
    }
}

/// Maintenance or repair performed on an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMaintenance {
    /// Primary key.
    pub id: RecordId,
    /// Current lifecycle state.
    pub state: MaintenanceState,
    /// Maintenance classification.
    pub maintenance_type: MaintenanceType,
    /// Maintained asset.
    pub asset: Asset,
    /// Author of the record.
    pub created_by: Option<UserId>,
}

impl AssetMaintenance {
    /// Fields exposed by maintenance forms.
    pub const FIELDS: &'static [&'static str] = &[
        "asset",
        "type",
        "start_date",
        "end_date",
        "cost",
        "currency",
        "provider",
        "comments",
    ];

    /// Classification field.
    pub const TYPE_FIELD: &'static str = "type";

    /// Geography of the maintained asset.
    #[must_use]
    pub fn geography(&self) -> Geography {
        self.asset.geography()
    }
}
