use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::geography::Geography;
use crate::security::ModelKind;

named_vocabulary! {
    /// What an asset is allocated to.
    AllocationKind {
        /// Funding project contract.
        ProjectContract => "PROJECT_CONTRACT",
        /// Premises hosting the asset.
        Premises => "PREMISES",
        /// Usage (staff, vehicle pool...).
        Usage => "USAGE",
    }
}

impl AllocationKind {
    /// Permission model of this allocation kind.
    #[must_use]
    pub fn model(&self) -> ModelKind {
        match self {
            Self::ProjectContract => ModelKind::AssetAllocationProjectContract,
            Self::Premises => ModelKind::AssetAllocationPremises,
            Self::Usage => ModelKind::AssetAllocationUsage,
        }
    }
}

named_vocabulary! {
    /// Kind of confirmation requested from a third party.
    ConfirmationType {
        /// Receiving premises must accept an asset transfer.
        AssetTransferPremises => "ASSET_TRANSFER_PREMISES",
        /// Staff must acknowledge an assignment.
        AssetAssignment => "ASSET_ASSIGNMENT",
    }
}

named_vocabulary! {
    /// State of a confirmation.
    ConfirmationState {
        /// Not answered yet.
        Waiting => "WAITING",
        /// Accepted.
        Accepted => "ACCEPTED",
        /// Refused.
        Refused => "REFUSED",
    }
}

/// Confirmation attached to an allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// What is being confirmed.
    pub kind: ConfirmationType,
    /// Answer so far.
    pub state: ConfirmationState,
}

/// Allocation of one asset to a project contract, premises or usage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAllocation {
    /// Primary key.
    pub id: RecordId,
    /// Allocation kind, each kind has its own grant rules.
    pub kind: AllocationKind,
    /// Allocated asset.
    pub asset: Asset,
    /// Author of the allocation.
    pub created_by: Option<UserId>,
    /// Confirmations raised by the allocation.
    pub confirmations: Vec<Confirmation>,
}

impl AssetAllocation {
    /// Geography of the allocated asset.
    #[must_use]
    pub fn geography(&self) -> Geography {
        self.asset.geography()
    }

    /// Whether a premises transfer is still waiting for the receiving side.
    #[must_use]
    pub fn has_waiting_transfer(&self) -> bool {
        self.confirmations.iter().any(|confirmation| {
            confirmation.kind == ConfirmationType::AssetTransferPremises
                && confirmation.state == ConfirmationState::Waiting
        })
    }
}
