use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::geography::{AreaId, CountryId, Geography};

named_vocabulary! {
    /// Lifecycle state of a disposal plan.
    DisposalPlanState {
        /// Being written.
        Draft => "DRAFT",
        /// Waiting for a manager.
        UnderManagerValidation => "UNDER_MANAGER_VALIDATION",
        /// Waiting for a disposal validator from finance.
        UnderFinanceValidation => "UNDER_FINANCE_VALIDATION",
        /// Approved, assets can be disposed of.
        Validated => "VALIDATED",
        /// Assets disposed of.
        Done => "DONE",
    }
}

named_vocabulary! {
    /// Workflow transition of a disposal plan.
    DisposalPlanTransition {
        /// Hand the draft to a manager.
        Submit => "SUBMIT",
        /// Manager forwards the plan to finance.
        SubmitToFinance => "SUBMIT_TO_FINANCE",
        /// Send the plan back to draft.
        ToCorrect => "TO_CORRECT",
        /// Finance approves the plan.
        Validate => "VALIDATE",
        /// Assets leave the inventory for good.
        Dispose => "DISPOSE",
    }
}

/// Plan grouping assets to dispose of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisposalPlan {
    /// Primary key.
    pub id: RecordId,
    /// Current lifecycle state.
    pub state: DisposalPlanState,
    /// Country mission of the plan.
    pub country_mission: Option<CountryId>,
    /// Operational area of the plan.
    pub acted_area: Option<AreaId>,
    /// Assets covered by the plan.
    pub asset_ids: Vec<RecordId>,
    /// Author of the plan.
    pub created_by: Option<UserId>,
}

impl DisposalPlan {
    /// Fields exposed by disposal plan forms.
    pub const FIELDS: &'static [&'static str] = &[
        "country_mission",
        "acted_area",
        "assets",
        "reason",
        "removal_plan",
        "recycling_method",
        "reimbursed_amount",
        "reimbursed_currency",
        "recipient_name",
        "disposed_date",
        "comments",
    ];

    /// Fields frozen once the plan leaves manager review.
    pub const REVIEWED_FIELDS: &'static [&'static str] = &[
        "reason",
        "removal_plan",
        "recycling_method",
        "reimbursed_amount",
        "reimbursed_currency",
        "recipient_name",
    ];

    /// Field frozen once the plan is done.
    pub const DISPOSED_DATE_FIELD: &'static str = "disposed_date";

    /// Geography stored on the plan itself.
    #[must_use]
    pub fn geography(&self) -> Geography {
        Geography::new(self.country_mission, self.acted_area)
    }

    /// Whether the review-bound fields can still change.
    #[must_use]
    pub fn is_under_drafting(&self) -> bool {
        matches!(
            self.state,
            DisposalPlanState::Draft | DisposalPlanState::UnderManagerValidation
        )
    }
}
