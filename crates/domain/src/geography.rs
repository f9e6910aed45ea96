//! Geographic scoping primitives shared by grants and entities.
//!
//! Grants restrict a user along two axes, country and area. A missing
//! restriction on an axis is modelled as [`Scope::Any`] instead of a nullable
//! column so every comparison has to choose its null semantics explicitly.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Mission country identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryId(Uuid);

impl CountryId {
    /// Creates a random country identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a country identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for CountryId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for CountryId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Operational area identifier, always nested in one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AreaId(Uuid);

impl AreaId {
    /// Creates a random area identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an area identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AreaId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for AreaId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Restriction of a grant along one geographic axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Scope<T> {
    /// No restriction on this axis.
    Any,
    /// Restricted to exactly one value.
    Exactly(T),
}

impl<T: Copy + PartialEq> Scope<T> {
    /// Builds a scope from a nullable storage value.
    #[must_use]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Exactly(value),
            None => Self::Any,
        }
    }

    /// Returns the nullable storage value.
    #[must_use]
    pub fn value(&self) -> Option<T> {
        match self {
            Self::Any => None,
            Self::Exactly(value) => Some(*value),
        }
    }

    /// Returns whether this axis is unrestricted.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Row-side coverage: a row without a value on this axis is covered by
    /// every grant.
    #[must_use]
    pub fn covers(&self, row_value: Option<T>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(value) => row_value.is_none_or(|row_value| row_value == *value),
        }
    }

    /// Grant-side containment: only an unrestricted grant contains a target
    /// without a value on this axis.
    #[must_use]
    pub fn contains(&self, target: Option<T>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(value) => target == Some(*value),
        }
    }
}

impl<T> Default for Scope<T> {
    fn default() -> Self {
        Self::Any
    }
}

/// Effective country and area of an entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Geography {
    /// Mission country, when known.
    pub country: Option<CountryId>,
    /// Operational area, when known.
    pub area: Option<AreaId>,
}

impl Geography {
    /// Creates a geography from its two axes.
    #[must_use]
    pub fn new(country: Option<CountryId>, area: Option<AreaId>) -> Self {
        Self { country, area }
    }

    /// Geography with only a country axis.
    #[must_use]
    pub fn country_only(country: Option<CountryId>) -> Self {
        Self {
            country,
            area: None,
        }
    }
}

/// Physical location a premises sits on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    /// Operational area the place belongs to.
    pub acted_area: Option<AreaId>,
}

/// Office, warehouse or guesthouse assets are stored in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Premises {
    /// Country the premises is attached to.
    pub mission_country: Option<CountryId>,
    /// Location of the premises.
    pub place: Option<Place>,
}

impl Premises {
    /// Area reached through the premises place.
    #[must_use]
    pub fn acted_area(&self) -> Option<AreaId> {
        self.place.as_ref().and_then(|place| place.acted_area)
    }
}
