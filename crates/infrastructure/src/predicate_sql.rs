//! Rendering of row predicates into PostgreSQL `WHERE` fragments.

mod columns;

#[cfg(test)]
mod tests;

pub(crate) use columns::{RecordColumns, grant_columns, record_columns};

use fieldkit_application::{AccessPredicate, RowCondition};
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Appends `predicate` to the builder. Column references resolve through
/// `columns`, against the scanned table aliased as `record`.
pub(crate) fn push_predicate(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &RecordColumns,
    predicate: &AccessPredicate,
) {
    match predicate {
        AccessPredicate::All => {
            builder.push("TRUE");
        }
        AccessPredicate::Nothing => {
            builder.push("FALSE");
        }
        AccessPredicate::Condition(condition) => push_condition(builder, columns, condition),
        AccessPredicate::And(members) => push_group(builder, columns, members, " AND ", "TRUE"),
        AccessPredicate::Or(members) => push_group(builder, columns, members, " OR ", "FALSE"),
    }
}

fn push_group(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &RecordColumns,
    members: &[AccessPredicate],
    separator: &str,
    empty: &str,
) {
    if members.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push('(');
    for (index, member) in members.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_predicate(builder, columns, member);
    }
    builder.push(')');
}

fn push_condition(
    builder: &mut QueryBuilder<'_, Postgres>,
    columns: &RecordColumns,
    condition: &RowCondition,
) {
    match condition {
        RowCondition::HasPrimaryKey => {
            builder.push("record.id IS NOT NULL");
        }
        RowCondition::CountryCovered(country) => {
            push_covered(builder, columns.country, country.as_uuid());
        }
        RowCondition::AreaCovered(area) => push_covered(builder, columns.area, area.as_uuid()),
        RowCondition::CountryEquals(country) => {
            push_equals(builder, columns.country, country.as_uuid());
        }
        RowCondition::AreaEquals(area) => push_equals(builder, columns.area, area.as_uuid()),
        RowCondition::StateIs(state) => match columns.state {
            Some(column) => {
                builder.push(column);
                builder.push(" = ");
                builder.push_bind(*state);
            }
            None => {
                builder.push("FALSE");
            }
        },
        RowCondition::StateIsNot(state) => match columns.state {
            Some(column) => {
                builder.push(column);
                builder.push(" IS DISTINCT FROM ");
                builder.push_bind(*state);
            }
            None => {
                builder.push("TRUE");
            }
        },
        RowCondition::CreatedBy(user_id) => match columns.created_by {
            Some(column) => push_equals(builder, column, user_id.as_uuid()),
            None => {
                builder.push("FALSE");
            }
        },
        RowCondition::WaitingTransferConfirmation => {
            builder.push(columns.waiting_transfer.unwrap_or("FALSE"));
        }
        RowCondition::ModeIn(modes) => match columns.mode {
            Some(column) if !modes.is_empty() => {
                builder.push(column);
                builder.push(" = ANY(");
                builder.push_bind(
                    modes
                        .iter()
                        .map(|mode| mode.as_str().to_owned())
                        .collect::<Vec<_>>(),
                );
                builder.push(')');
            }
            _ => {
                builder.push("FALSE");
            }
        },
    }
}

// A missing value matches, like an unknown row axis in memory.
fn push_covered(builder: &mut QueryBuilder<'_, Postgres>, expression: &str, value: Uuid) {
    builder.push('(');
    builder.push(expression);
    builder.push(" IS NULL OR ");
    builder.push(expression);
    builder.push(" = ");
    builder.push_bind(value);
    builder.push(')');
}

fn push_equals(builder: &mut QueryBuilder<'_, Postgres>, expression: &str, value: Uuid) {
    builder.push(expression);
    builder.push(" = ");
    builder.push_bind(value);
}
