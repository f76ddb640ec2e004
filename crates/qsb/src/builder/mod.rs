//! Fluent statement builder.
//!
//! A [`QueryStringBuilder`] accumulates clauses for exactly one statement and
//! renders them with [`build`](QueryStringBuilder::build). Every clause method
//! takes `&mut self` and returns it, so calls chain:
//!
//! ```ignore
//! use qsb::QueryStringBuilder;
//!
//! let mut q = QueryStringBuilder::new();
//! q.select(["id", "name"])
//!     .from("users", None)
//!     .where_("status", "=", "active")
//!     .limit(None, 10)
//!     .build()?;
//! assert_eq!(
//!     q.to_string(),
//!     "SELECT `id`,`name` FROM `users` WHERE `status` = 'active' LIMIT 10;"
//! );
//! # Ok::<(), qsb::QsbError>(())
//! ```
//!
//! ## Design
//!
//! - Clause fragments are quoted/escaped when they are added and only ever
//!   appended; rendering is a pure function of the accumulated [`Clauses`].
//! - Methods that can detect bad input (`values`, `set_values`, `on`, ...)
//!   return [`QsbResult`]; statement-shape problems surface from `build()`.
//! - The rendered text is cached; reading it never triggers a render.

pub mod clauses;
pub mod render;

pub use clauses::{
    Clauses, Combinator, Command, JoinClause, Limit, Predicate, Projection, SortOrder, TableRef,
};

use crate::error::{QsbError, QsbResult};
use crate::escape::{escape_literal, escape_text, format_value, looks_like_function_call, quote_identifier};
use crate::logger::{SqlLogger, default_logger};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Text held by a builder before the first successful `build()`.
pub const NOT_BUILT: &str = "SELECT 'QUERY NOT BUILD'";

/// Fluent MySQL statement builder.
///
/// One instance builds one statement; there is no reset.
#[must_use]
pub struct QueryStringBuilder {
    clauses: Clauses,
    rendered: String,
    forced: bool,
    logger: Arc<dyn SqlLogger>,
}

impl Default for QueryStringBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryStringBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryStringBuilder")
            .field("clauses", &self.clauses)
            .field("rendered", &self.rendered)
            .field("forced", &self.forced)
            .finish_non_exhaustive()
    }
}

impl QueryStringBuilder {
    /// Create an empty builder that logs through the process-wide default logger.
    pub fn new() -> Self {
        Self::with_logger(default_logger())
    }

    /// Create an empty builder with a specific logger.
    pub fn with_logger(logger: Arc<dyn SqlLogger>) -> Self {
        Self {
            clauses: Clauses::default(),
            rendered: NOT_BUILT.to_string(),
            forced: false,
            logger,
        }
    }

    /// The currently selected command.
    pub fn command(&self) -> Command {
        self.clauses.command
    }

    /// The accumulated clause state.
    pub fn clauses(&self) -> &Clauses {
        &self.clauses
    }

    fn select_command(&mut self, command: Command) {
        let previous = self.clauses.command;
        if previous != Command::Unset && previous != command {
            tracing::warn!(
                target: "qsb.builder",
                from = %previous,
                to = %command,
                "command re-selected; the last one wins"
            );
        }
        self.clauses.command = command;
    }

    // ── Commands ──

    /// Start a SELECT.
    ///
    /// - [`Projection::All`] or `""` selects `*`;
    /// - a list of names quotes and appends each one;
    /// - a single string is used verbatim (e.g. `"COUNT(*) AS cnt"`).
    pub fn select(&mut self, projection: impl Into<Projection>) -> &mut Self {
        self.select_command(Command::Select);
        match projection.into() {
            Projection::All => self.clauses.projection = vec![Clauses::WILDCARD.to_string()],
            Projection::Columns(cols) => {
                for col in &cols {
                    self.get(col);
                }
            }
            Projection::Raw(expr) => self.clauses.projection = vec![expr],
        }
        self
    }

    /// Start a SELECT and add `table` to FROM.
    pub fn select_all(&mut self, table: &str, alias: Option<&str>) -> &mut Self {
        self.select_command(Command::Select);
        self.from(table, alias)
    }

    /// Start an UPDATE of `table`.
    pub fn update(&mut self, table: &str) -> &mut Self {
        self.select_command(Command::Update);
        self.clauses.note_identifier("UPDATE", table);
        self.clauses.targets = vec![TableRef::new(table, None)];
        self
    }

    /// Start an INSERT, optionally naming the table (see [`into_table`](Self::into_table)).
    pub fn insert(&mut self, table: Option<&str>) -> &mut Self {
        self.select_command(Command::Insert);
        if let Some(table) = table {
            self.into_table(table);
        }
        self
    }

    /// Start a DELETE from `table`.
    pub fn delete(&mut self, table: &str) -> &mut Self {
        self.select_command(Command::Delete);
        self.clauses.note_identifier("DELETE", table);
        self.clauses.targets = vec![TableRef::new(table, None)];
        self
    }

    /// Use INSERT IGNORE.
    pub fn ignore(&mut self) -> &mut Self {
        self.clauses.ignore = true;
        self
    }

    /// Set the INSERT target table (`INTO table`).
    pub fn into_table(&mut self, table: &str) -> &mut Self {
        self.clauses.note_identifier("INTO", table);
        self.clauses.targets = vec![TableRef::new(table, None)];
        self
    }

    // ── Tables ──

    /// Add a table to FROM. Repeated calls are comma-joined.
    pub fn from(&mut self, table: &str, alias: Option<&str>) -> &mut Self {
        let target = TableRef::new(table, alias);
        if target.is_blank() {
            self.clauses.note_identifier("FROM", "");
        }
        self.clauses.targets.push(target);
        self
    }

    /// Add a JOIN.
    pub fn join(&mut self, table: &str, alias: Option<&str>) -> &mut Self {
        let table = TableRef::new(table, alias);
        if table.is_blank() {
            self.clauses.note_identifier("JOIN", "");
        }
        self.clauses.joins.push(JoinClause {
            table,
            conditions: Vec::new(),
        });
        self
    }

    /// Add an ON condition to the most recent JOIN (AND-combined).
    ///
    /// Both sides are escaped as *literals*, not quoted as identifiers; the
    /// operator is used verbatim.
    pub fn on(
        &mut self,
        left: impl Into<Value>,
        op: &str,
        right: impl Into<Value>,
    ) -> QsbResult<&mut Self> {
        let join = self
            .clauses
            .joins
            .last_mut()
            .ok_or(QsbError::JoinConditionWithoutJoin)?;
        join.conditions.push(format!(
            "{} {} {}",
            escape_literal(&left.into()),
            op,
            escape_literal(&right.into())
        ));
        Ok(self)
    }

    // ── Projection ──

    /// Append one quoted projection column, replacing the `*` wildcard.
    pub fn get(&mut self, column: &str) -> &mut Self {
        if self.clauses.is_wildcard() {
            self.clauses.projection.clear();
        }
        self.clauses.note_identifier("SELECT", column);
        self.clauses.projection.push(quote_identifier(column));
        self
    }

    // ── Values / assignments ──

    /// Add columns and values.
    ///
    /// For UPDATE each column becomes a SET assignment, taking the matching
    /// value or the `?` placeholder when `values` is `None`.
    ///
    /// Otherwise the columns are appended to the INSERT column list and
    /// `values` becomes one row. With `values == None` the row set is left to
    /// the driver and the statement ends in ` VALUES ?` with no `;`.
    pub fn values<V>(&mut self, columns: &[&str], values: Option<Vec<V>>) -> QsbResult<&mut Self>
    where
        V: Into<Value>,
    {
        check_columns(columns)?;
        let values: Option<Vec<Value>> = values.map(|vs| vs.into_iter().map(Into::into).collect());
        if let Some(values) = &values {
            check_lengths("values", columns.len(), values.len())?;
        }

        if self.clauses.command == Command::Update {
            match values {
                Some(values) => {
                    for (col, value) in columns.iter().zip(values) {
                        self.set(col, value);
                    }
                }
                None => {
                    for col in columns {
                        self.set(col, Value::placeholder());
                    }
                }
            }
            return Ok(self);
        }

        self.clauses
            .insert_columns
            .extend(columns.iter().map(|c| quote_identifier(c)));
        match values {
            Some(values) => {
                let row = values
                    .iter()
                    .map(|v| {
                        if v.is_placeholder() {
                            escape_literal(v)
                        } else {
                            format_value(v)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                self.clauses.insert_rows.push(format!("({row})"));
            }
            None => self.clauses.bulk_insert = true,
        }
        Ok(self)
    }

    /// Append one more row to a multi-row INSERT.
    pub fn add_values<V>(&mut self, values: Vec<V>) -> &mut Self
    where
        V: Into<Value>,
    {
        let row = values
            .into_iter()
            .map(|v| escape_literal(&v.into()))
            .collect::<Vec<_>>()
            .join(",");
        self.clauses.insert_rows.push(format!("({row})"));
        self
    }

    /// Add a SET assignment `` `column`=value ``.
    ///
    /// Null renders `NULL`; dates render as `'YYYY-MM-DD HH:MM:SS'`; the `?`
    /// placeholder is kept.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
        let value = value.into();
        self.clauses.note_identifier("SET", column);
        self.clauses
            .assignments
            .push(format!("{}={}", quote_identifier(column), escape_literal(&value)));
        self
    }

    /// Add `` `column`=? `` for every column (batch placeholder mode).
    pub fn set_placeholders(&mut self, columns: &[&str]) -> &mut Self {
        for col in columns {
            self.clauses.note_identifier("SET", col);
            self.clauses
                .assignments
                .push(format!("{}=?", quote_identifier(col)));
        }
        self
    }

    /// Pair columns with values positionally as `` `column` = value ``.
    ///
    /// Unlike [`set`](Self::set), text values are always quoted here, so a
    /// `?` renders as `'?'`.
    pub fn set_values<V>(&mut self, columns: &[&str], values: Vec<V>) -> QsbResult<&mut Self>
    where
        V: Into<Value>,
    {
        check_columns(columns)?;
        check_lengths("set_values", columns.len(), values.len())?;
        for (col, value) in columns.iter().zip(values) {
            let rendered = match value.into() {
                Value::Text(text) => escape_text(&text),
                other => escape_literal(&other),
            };
            self.clauses
                .assignments
                .push(format!("{} = {}", quote_identifier(col), rendered));
        }
        Ok(self)
    }

    // ── WHERE ──

    /// Add an AND-combined WHERE predicate `` `left` op right ``.
    ///
    /// - a list renders as `(a,b,c)`; an empty list fails at `build()`;
    /// - with `op == "is"` the right side is used verbatim (`IS NULL`);
    /// - function-call-shaped text (`NOW()`) is used verbatim;
    /// - anything else is escaped.
    pub fn where_(&mut self, left: &str, op: &str, right: impl Into<Value>) -> &mut Self {
        let right = right.into();
        self.note_predicate(left, &right);
        let rendered = match &right {
            Value::List(_) => escape_literal(&right),
            _ if op == "is" => verbatim(&right),
            Value::Text(text) if looks_like_function_call(text) => text.clone(),
            _ => escape_literal(&right),
        };
        let text = format!("{} {} {}", quote_identifier(left), op, rendered);
        self.clauses.push_predicate(Combinator::And, text);
        self
    }

    /// Add an OR-combined WHERE predicate. The right side is always escaped.
    pub fn where_or(&mut self, left: &str, op: &str, right: impl Into<Value>) -> &mut Self {
        let right = right.into();
        self.note_predicate(left, &right);
        let text = format!("{} {} {}", quote_identifier(left), op, escape_literal(&right));
        self.clauses.push_predicate(Combinator::Or, text);
        self
    }

    fn note_predicate(&mut self, left: &str, right: &Value) {
        self.clauses.note_identifier("WHERE", left);
        let empty = matches!(right, Value::List(items) if items.is_empty());
        if empty && self.clauses.empty_list.is_none() {
            self.clauses.empty_list = Some(left.to_string());
        }
    }

    // ── Upsert ──

    /// Add `ON DUPLICATE KEY UPDATE` assignments, skipping excluded columns.
    pub fn on_duplicate_key_update<V>(
        &mut self,
        columns: &[&str],
        values: Vec<V>,
        exclude: &[&str],
    ) -> QsbResult<&mut Self>
    where
        V: Into<Value>,
    {
        check_columns(columns)?;
        check_lengths("on_duplicate_key_update", columns.len(), values.len())?;
        for (col, value) in columns.iter().zip(values) {
            if exclude.contains(col) {
                continue;
            }
            self.clauses.upsert.push(format!(
                "{}={}",
                quote_identifier(col),
                format_value(&value.into())
            ));
        }
        Ok(self)
    }

    // ── Ordering / grouping / limit ──

    /// `LIMIT row_count`, or `LIMIT offset, row_count` for a non-zero offset.
    pub fn limit(&mut self, offset: Option<u64>, row_count: u64) -> &mut Self {
        self.clauses.limit = Some(Limit { offset, row_count });
        self
    }

    /// Append `` `column` ASC|DESC `` to ORDER BY.
    pub fn order_by(&mut self, column: &str, order: SortOrder) -> &mut Self {
        self.clauses.note_identifier("ORDER BY", column);
        self.clauses
            .ordering
            .push(format!("{} {}", quote_identifier(column), order.as_sql()));
        self
    }

    /// Append a quoted column to GROUP BY.
    pub fn group_by(&mut self, column: &str) -> &mut Self {
        self.clauses.note_identifier("GROUP BY", column);
        self.clauses.grouping.push(quote_identifier(column));
        self
    }

    /// Append columns to GROUP BY, comma-joined and *not* quoted.
    pub fn group_by_columns(&mut self, columns: &[&str]) -> &mut Self {
        if !columns.is_empty() {
            for col in columns {
                self.clauses.note_identifier("GROUP BY", col);
            }
            self.clauses.grouping.push(columns.join(","));
        }
        self
    }

    // ── Terminal operations ──

    /// Replace the rendered text with `sql`.
    ///
    /// A later `build()` with a selected command overwrites it again.
    pub fn force_query(&mut self, sql: impl Into<String>) -> &mut Self {
        self.rendered = sql.into();
        self.forced = true;
        self
    }

    /// Render the statement and store it.
    ///
    /// Calling it again without further changes reproduces the same text.
    pub fn build(&mut self) -> QsbResult<&mut Self> {
        if self.clauses.command == Command::Unset && self.forced {
            return Ok(self);
        }
        self.rendered = render::render(&self.clauses)?;
        Ok(self)
    }

    /// The last rendered text, or [`NOT_BUILT`].
    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    /// Whether the stored text came from `build()` or `force_query()`.
    pub fn is_built(&self) -> bool {
        self.forced || self.rendered != NOT_BUILT
    }

    /// Hand the rendered text and its parameters to the logger.
    pub fn log(&self, params: &[Value]) -> &Self {
        self.logger.log_sql(&self.rendered, params);
        self
    }

    /// Log the rendered text without parameters.
    pub fn print_string(&self) -> &Self {
        self.logger.log_sql(&self.rendered, &[]);
        self
    }

    /// Log the accumulated clause state as JSON.
    pub fn print_object(&self) -> &Self {
        match serde_json::to_string(&self.clauses) {
            Ok(state) => self.logger.log_state(&state),
            Err(e) => tracing::warn!(target: "qsb.builder", error = %e, "failed to serialize builder state"),
        }
        self
    }
}

impl fmt::Display for QueryStringBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

/// Render a value without escaping (the `IS NULL` right-hand side).
fn verbatim(value: &Value) -> String {
    match value {
        Value::Text(s) | Value::Raw(s) => s.clone(),
        other => escape_literal(other),
    }
}

fn check_columns(columns: &[&str]) -> QsbResult<()> {
    match columns.iter().position(|c| c.trim().is_empty()) {
        Some(index) => Err(QsbError::missing_column(index, columns)),
        None => Ok(()),
    }
}

fn check_lengths(operation: &'static str, columns: usize, values: usize) -> QsbResult<()> {
    if columns != values {
        return Err(QsbError::LengthMismatch {
            operation,
            columns,
            values,
        });
    }
    Ok(())
}

// ── Entry points ──

/// Start a SELECT with the given projection.
pub fn select(projection: impl Into<Projection>) -> QueryStringBuilder {
    let mut qb = QueryStringBuilder::new();
    qb.select(projection);
    qb
}

/// Start an INSERT into `table`.
pub fn insert(table: &str) -> QueryStringBuilder {
    let mut qb = QueryStringBuilder::new();
    qb.insert(Some(table));
    qb
}

/// Start an UPDATE of `table`.
pub fn update(table: &str) -> QueryStringBuilder {
    let mut qb = QueryStringBuilder::new();
    qb.update(table);
    qb
}

/// Start a DELETE from `table`.
pub fn delete(table: &str) -> QueryStringBuilder {
    let mut qb = QueryStringBuilder::new();
    qb.delete(table);
    qb
}
