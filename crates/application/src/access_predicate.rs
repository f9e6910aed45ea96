//! Row predicates produced by entity policies.
//!
//! A predicate is evaluated two ways: in memory against a row snapshot with
//! [`AccessPredicate::matches`], and pushed down to storage by adapters that
//! render the same tree into a query filter.

mod rows;


use std::collections::HashSet;

use fieldkit_core::{RecordId, UserId};
use fieldkit_domain::{AccessMode, AreaId, CountryId, Geography};

/// Shape of a row as seen by access predicates.
pub trait ScopedRow {
    /// Primary key, `None` for rows that are not persisted yet.
    fn row_id(&self) -> Option<RecordId>;

    /// Effective country and area of the row.
    fn geography(&self) -> Geography;

    /// Workflow state name, for entities driven by the workflow engine.
    fn state_name(&self) -> Option<&'static str> {
        None
    }

    /// Author of the row.
    fn created_by(&self) -> Option<UserId> {
        None
    }

    /// Whether a premises transfer confirmation is still waiting.
    fn has_waiting_transfer(&self) -> bool {
        false
    }

    /// Mode carried by the row, for grant rows.
    fn grant_mode(&self) -> Option<AccessMode> {
        None
    }
}

/// Single condition over one row column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowCondition {
    /// Row is persisted. Stands for "no restriction" inside a grant clause.
    HasPrimaryKey,
    /// Row country equals the value or is unknown.
    CountryCovered(CountryId),
    /// Row area equals the value or is unknown.
    AreaCovered(AreaId),
    /// Row country equals the value.
    CountryEquals(CountryId),
    /// Row area equals the value.
    AreaEquals(AreaId),
    /// Row is in the workflow state.
    StateIs(&'static str),
    /// Row is not in the workflow state.
    StateIsNot(&'static str),
    /// Row was created by the user.
    CreatedBy(UserId),
    /// Row has a premises transfer confirmation waiting for an answer.
    WaitingTransferConfirmation,
    /// Grant row mode is one of the listed modes.
    ModeIn(Vec<AccessMode>),
}

impl RowCondition {
    /// Evaluates the condition against one row.
    #[must_use]
    pub fn matches<R: ScopedRow + ?Sized>(&self, row: &R) -> bool {
        match self {
            Self::HasPrimaryKey => row.row_id().is_some(),
            Self::CountryCovered(country) => row
                .geography()
                .country
                .is_none_or(|value| value == *country),
            Self::AreaCovered(area) => row.geography().area.is_none_or(|value| value == *area),
            Self::CountryEquals(country) => row.geography().country == Some(*country),
            Self::AreaEquals(area) => row.geography().area == Some(*area),
            Self::StateIs(state) => row.state_name() == Some(*state),
            Self::StateIsNot(state) => row.state_name() != Some(*state),
            Self::CreatedBy(user_id) => row.created_by() == Some(*user_id),
            Self::WaitingTransferConfirmation => row.has_waiting_transfer(),
            Self::ModeIn(modes) => row.grant_mode().is_some_and(|mode| modes.contains(&mode)),
        }
    }
}

/// Boolean row filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPredicate {
    /// Matches every row.
    All,
    /// Matches no row.
    Nothing,
    /// Matches rows satisfying one condition.
    Condition(RowCondition),
    /// Matches rows satisfying every member.
    And(Vec<AccessPredicate>),
    /// Matches rows satisfying at least one member.
    Or(Vec<AccessPredicate>),
}

impl AccessPredicate {
    /// Conjunction with constant folding. An empty list matches everything.
    #[must_use]
    pub fn all_of(predicates: impl IntoIterator<Item = AccessPredicate>) -> Self {
        let mut members = Vec::new();
        for predicate in predicates {
            match predicate {
                Self::All => {}
                Self::Nothing => return Self::Nothing,
                Self::And(nested) => members.extend(nested),
                other => members.push(other),
            }
        }

        match members.len() {
            0 => Self::All,
            1 => members.pop().unwrap_or(Self::All),
            _ => Self::And(members),
        }
    }

    /// Disjunction with constant folding. An empty list matches nothing, so a
    /// user whose grants all fold away never sees every row.
    #[must_use]
    pub fn any_of(predicates: impl IntoIterator<Item = AccessPredicate>) -> Self {
        let mut members = Vec::new();
        for predicate in predicates {
            match predicate {
                Self::Nothing => {}
                Self::All => return Self::All,
                Self::Or(nested) => members.extend(nested),
                other => members.push(other),
            }
        }

        match members.len() {
            0 => Self::Nothing,
            1 => members.pop().unwrap_or(Self::Nothing),
            _ => Self::Or(members),
        }
    }

    /// Shorthand for a single condition.
    #[must_use]
    pub fn condition(condition: RowCondition) -> Self {
        Self::Condition(condition)
    }

    /// Conjunction of two predicates.
    #[must_use]
    pub fn and(self, other: AccessPredicate) -> Self {
        Self::all_of([self, other])
    }

    /// Returns whether the predicate statically matches nothing.
    #[must_use]
    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    /// Returns whether the predicate statically matches everything.
    #[must_use]
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Evaluates the predicate against one row.
    #[must_use]
    pub fn matches<R: ScopedRow + ?Sized>(&self, row: &R) -> bool {
        match self {
            Self::All => true,
            Self::Nothing => false,
            Self::Condition(condition) => condition.matches(row),
            Self::And(members) => members.iter().all(|member| member.matches(row)),
            Self::Or(members) => members.iter().any(|member| member.matches(row)),
        }
    }

    /// Keeps matching rows, each primary key at most once.
    #[must_use]
    pub fn filter<'a, R: ScopedRow>(&self, rows: impl IntoIterator<Item = &'a R>) -> Vec<&'a R>
    where
        R: 'a,
    {
        let mut seen = HashSet::new();
        rows.into_iter()
            .filter(|row| self.matches(*row))
            .filter(|row| match row.row_id() {
                Some(row_id) => seen.insert(row_id),
                None => true,
            })
            .collect()
    }
}
