//! Statement assembly.
//!
//! [`render`] is a pure function of [`Clauses`]: the same record always
//! produces the same text.

use super::clauses::{Clauses, Command, TableRef};
use crate::error::{QsbError, QsbResult};
use crate::value::PLACEHOLDER;

const BULK_VALUES: &str = " VALUES ?";

/// Validate and render the accumulated clauses into one statement.
pub fn render(clauses: &Clauses) -> QsbResult<String> {
    validate(clauses)?;
    Ok(match clauses.command {
        Command::Select => render_select(clauses),
        Command::Insert => render_insert(clauses),
        Command::Update => render_update(clauses),
        Command::Delete => render_delete(clauses),
        Command::Unset => return Err(QsbError::CommandNotSelected),
    })
}

/// Check that the clauses form a statement the command's shape can carry.
///
/// Clauses the render branch would silently drop are rejected.
pub fn validate(clauses: &Clauses) -> QsbResult<()> {
    let command = clauses.command;
    let reject = |present: bool, clause: &'static str| -> QsbResult<()> {
        if present {
            Err(QsbError::IllegalClause { clause, command })
        } else {
            Ok(())
        }
    };
    if command == Command::Unset {
        return Err(QsbError::CommandNotSelected);
    }
    if let Some(clause) = clauses.blank_identifier {
        return Err(QsbError::BlankIdentifier { clause });
    }
    if let Some(column) = &clauses.empty_list {
        return Err(QsbError::EmptyList {
            column: column.clone(),
        });
    }

    let has_insert = !clauses.insert_columns.is_empty()
        || !clauses.insert_rows.is_empty()
        || clauses.bulk_insert;

    match command {
        Command::Unset => Err(QsbError::CommandNotSelected),
        Command::Select => {
            reject(!clauses.assignments.is_empty(), "SET")?;
            reject(has_insert, "VALUES")?;
            reject(!clauses.upsert.is_empty(), "ON DUPLICATE KEY UPDATE")?;
            reject(clauses.ignore, "IGNORE")
        }
        Command::Update => {
            require_target(clauses)?;
            if clauses.assignments.is_empty() {
                return Err(QsbError::validation("UPDATE statement has no SET assignments"));
            }
            reject(!clauses.projection.is_empty(), "column projection")?;
            reject(!clauses.joins.is_empty(), "JOIN")?;
            reject(has_insert, "VALUES")?;
            reject(!clauses.upsert.is_empty(), "ON DUPLICATE KEY UPDATE")?;
            reject(clauses.ignore, "IGNORE")?;
            reject_select_tail(clauses, reject)
        }
        Command::Insert => {
            require_target(clauses)?;
            if clauses.insert_columns.is_empty() {
                return Err(QsbError::validation("INSERT statement has no columns"));
            }
            if clauses.bulk_insert && !clauses.insert_rows.is_empty() {
                return Err(QsbError::validation(
                    "INSERT cannot mix driver-supplied rows (VALUES ?) with explicit rows",
                ));
            }
            if !clauses.bulk_insert && clauses.insert_rows.is_empty() {
                return Err(QsbError::validation("INSERT statement has no VALUES"));
            }
            reject(!clauses.projection.is_empty(), "column projection")?;
            reject(!clauses.joins.is_empty(), "JOIN")?;
            reject(!clauses.predicates.is_empty(), "WHERE")?;
            reject(!clauses.assignments.is_empty(), "SET")?;
            reject_select_tail(clauses, reject)
        }
        Command::Delete => {
            require_target(clauses)?;
            reject(!clauses.projection.is_empty(), "column projection")?;
            reject(!clauses.joins.is_empty(), "JOIN")?;
            reject(!clauses.assignments.is_empty(), "SET")?;
            reject(has_insert, "VALUES")?;
            reject(!clauses.upsert.is_empty(), "ON DUPLICATE KEY UPDATE")?;
            reject(clauses.ignore, "IGNORE")?;
            reject_select_tail(clauses, reject)
        }
    }
}

fn require_target(clauses: &Clauses) -> QsbResult<()> {
    if clauses.targets.is_empty() {
        return Err(QsbError::MissingTarget(clauses.command));
    }
    Ok(())
}

fn reject_select_tail(
    clauses: &Clauses,
    reject: impl Fn(bool, &'static str) -> QsbResult<()>,
) -> QsbResult<()> {
    reject(!clauses.ordering.is_empty(), "ORDER BY")?;
    reject(!clauses.grouping.is_empty(), "GROUP BY")?;
    reject(clauses.limit.is_some(), "LIMIT")
}

fn render_select(c: &Clauses) -> String {
    let mut sql = String::from("SELECT ");
    if c.projection.is_empty() {
        sql.push_str(Clauses::WILDCARD);
    } else {
        sql.push_str(&c.projection.join(","));
    }

    if !c.targets.is_empty() {
        sql.push_str(" FROM ");
        sql.push_str(&join_tables(&c.targets));
    }

    for join in &c.joins {
        sql.push_str(" JOIN ");
        sql.push_str(&join.table.to_sql());
        if !join.conditions.is_empty() {
            sql.push_str(" ON ");
            sql.push_str(&join.conditions.join(" AND "));
        }
    }

    push_where(c, &mut sql);

    if !c.ordering.is_empty() {
        sql.push_str(" ORDER BY ");
        sql.push_str(&c.ordering.join(", "));
    }

    if !c.grouping.is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&c.grouping.join(", "));
    }

    if let Some(limit) = &c.limit {
        sql.push_str(&limit.to_sql());
    }

    sql.push(';');
    sql
}

fn render_update(c: &Clauses) -> String {
    let mut sql = String::from("UPDATE ");
    sql.push_str(&join_tables(&c.targets));
    sql.push_str(" SET ");
    sql.push_str(&c.assignments.join(","));
    push_where(c, &mut sql);
    sql.push(';');
    sql
}

fn render_insert(c: &Clauses) -> String {
    let mut sql = String::from("INSERT ");
    if c.ignore {
        sql.push_str("IGNORE ");
    }
    sql.push_str("INTO ");
    sql.push_str(&join_tables(&c.targets));
    sql.push_str(" (");
    sql.push_str(&c.insert_columns.join(", "));
    sql.push(')');

    let values = if c.insert_rows.is_empty() {
        BULK_VALUES.to_string()
    } else {
        format!(" VALUES {}", c.insert_rows.join(","))
    };
    sql.push_str(&values);

    if !c.upsert.is_empty() {
        sql.push_str(" ON DUPLICATE KEY UPDATE ");
        sql.push_str(&c.upsert.join(", "));
        sql.push(';');
    } else if !values.ends_with(PLACEHOLDER) {
        sql.push(';');
    }
    sql
}

fn render_delete(c: &Clauses) -> String {
    let mut sql = String::from("DELETE FROM ");
    sql.push_str(&join_tables(&c.targets));
    push_where(c, &mut sql);
    sql.push(';');
    sql
}

fn push_where(c: &Clauses, sql: &mut String) {
    if c.predicates.is_empty() {
        return;
    }
    sql.push_str(" WHERE ");
    for predicate in &c.predicates {
        if let Some(combinator) = predicate.combinator {
            sql.push_str(combinator.as_sql());
        }
        sql.push_str(&predicate.text);
    }
}

fn join_tables(targets: &[TableRef]) -> String {
    targets
        .iter()
        .map(TableRef::to_sql)
        .collect::<Vec<_>>()
        .join(", ")
}
