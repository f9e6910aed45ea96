use fieldkit_core::{RecordId, UserId};
use serde::{Deserialize, Serialize};

use crate::geography::{AreaId, CountryId, Geography};

/// Supplier registry entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    /// Primary key.
    pub id: RecordId,
    /// Country the supplier operates in.
    pub country: Option<CountryId>,
    /// Area the supplier operates in.
    pub area: Option<AreaId>,
    /// Author of the entry.
    pub created_by: Option<UserId>,
}

impl Supplier {
    /// Geography stored on the supplier.
    #[must_use]
    pub fn geography(&self) -> Geography {
        Geography::new(self.country, self.area)
    }
}

/// Procurement request, scoped by country only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procurement {
    /// Primary key.
    pub id: RecordId,
    /// Country mission issuing the request.
    pub country: Option<CountryId>,
    /// Author of the request.
    pub created_by: Option<UserId>,
}

impl Procurement {
    /// Geography stored on the request.
    #[must_use]
    pub fn geography(&self) -> Geography {
        Geography::country_only(self.country)
    }
}
