use crate::escape::quote_identifier;
use serde::Serialize;
use std::fmt;

/// The statement kind a builder renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Command {
    /// No command selected yet.
    #[default]
    Unset,
    /// SELECT query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// DELETE statement
    Delete,
}

impl Command {
    /// SQL keyword for this command (`""` when unset).
    pub fn keyword(self) -> &'static str {
        match self {
            Command::Unset => "",
            Command::Select => "SELECT",
            Command::Insert => "INSERT",
            Command::Update => "UPDATE",
            Command::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Unset => f.write_str("UNSET"),
            other => f.write_str(other.keyword()),
        }
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortOrder {
    /// Ascending
    Asc,
    /// Descending
    Desc,
}

impl SortOrder {
    /// `ASC` or `DESC`.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// How a WHERE predicate joins the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    /// The keyword with its surrounding spaces.
    pub fn as_sql(self) -> &'static str {
        match self {
            Combinator::And => " AND ",
            Combinator::Or => " OR ",
        }
    }
}

/// Projection argument for [`select`](super::QueryStringBuilder::select).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`
    All,
    /// Column names, each quoted.
    Columns(Vec<String>),
    /// A raw expression used verbatim, e.g. `COUNT(*) AS cnt`.
    Raw(String),
}

impl From<&str> for Projection {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Projection::All
        } else {
            Projection::Raw(s.to_string())
        }
    }
}

impl From<String> for Projection {
    fn from(s: String) -> Self {
        Projection::from(s.as_str())
    }
}

impl From<Option<&str>> for Projection {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Projection::All, Projection::from)
    }
}

impl From<&[&str]> for Projection {
    fn from(cols: &[&str]) -> Self {
        Projection::Columns(cols.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Projection {
    fn from(cols: [&str; N]) -> Self {
        Projection::Columns(cols.iter().map(|c| c.to_string()).collect())
    }
}

impl<const N: usize> From<&[&str; N]> for Projection {
    fn from(cols: &[&str; N]) -> Self {
        Projection::from(&cols[..])
    }
}

impl From<Vec<&str>> for Projection {
    fn from(cols: Vec<&str>) -> Self {
        Projection::from(cols.as_slice())
    }
}

impl From<Vec<String>> for Projection {
    fn from(cols: Vec<String>) -> Self {
        Projection::Columns(cols)
    }
}

/// A table reference with an optional alias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRef {
    /// Table name, possibly dotted (`db.users`).
    pub name: String,
    /// Alias rendered after the quoted name.
    pub alias: Option<String>,
}

impl TableRef {
    /// Create a table reference.
    pub fn new(name: &str, alias: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            alias: alias.map(str::to_string),
        }
    }

    /// `` `name` `` or `` `name` `alias` ``.
    pub fn to_sql(&self) -> String {
        let mut out = quote_identifier(&self.name);
        if let Some(alias) = &self.alias {
            out.push(' ');
            out.push_str(&quote_identifier(alias));
        }
        out
    }

    /// Whether the name or a given alias is blank.
    pub(crate) fn is_blank(&self) -> bool {
        self.name.trim().is_empty() || self.alias.as_deref().is_some_and(|a| a.trim().is_empty())
    }
}

/// A JOIN with its accumulated ON conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinClause {
    pub table: TableRef,
    /// Rendered conditions, AND-combined.
    pub conditions: Vec<String>,
}

/// A rendered WHERE predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    /// `None` for the first predicate.
    pub combinator: Option<Combinator>,
    pub text: String,
}

/// LIMIT clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limit {
    /// Rows to skip; `None` and `Some(0)` both render without an offset.
    pub offset: Option<u64>,
    /// Maximum number of rows.
    pub row_count: u64,
}

impl Limit {
    /// `LIMIT n`, or `LIMIT o, n` for a non-zero offset.
    pub fn to_sql(&self) -> String {
        match self.offset {
            Some(offset) if offset != 0 => format!(" LIMIT {}, {}", offset, self.row_count),
            _ => format!(" LIMIT {}", self.row_count),
        }
    }
}

/// Accumulated clause state of one statement.
///
/// Fragments are stored pre-rendered (quoted/escaped) and only ever appended;
/// [`render`](super::render::render) is a pure function of this record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Clauses {
    pub command: Command,
    /// Projection fragments; `["*"]` is the wildcard, empty renders as `*`.
    pub projection: Vec<String>,
    pub targets: Vec<TableRef>,
    pub joins: Vec<JoinClause>,
    pub predicates: Vec<Predicate>,
    /// SET fragments (`` `col`=value ``).
    pub assignments: Vec<String>,
    /// Quoted INSERT columns.
    pub insert_columns: Vec<String>,
    /// Rendered INSERT value tuples, including their parentheses.
    pub insert_rows: Vec<String>,
    /// Rows are supplied by the driver (` VALUES ?`).
    pub bulk_insert: bool,
    /// ON DUPLICATE KEY UPDATE fragments.
    pub upsert: Vec<String>,
    pub ordering: Vec<String>,
    pub grouping: Vec<String>,
    pub limit: Option<Limit>,
    pub ignore: bool,
    /// Clause of the first blank identifier, reported by `build()`.
    pub blank_identifier: Option<&'static str>,
    /// Column of the first empty value list in WHERE, reported by `build()`.
    pub empty_list: Option<String>,
}

impl Clauses {
    pub(crate) const WILDCARD: &'static str = "*";

    pub(crate) fn is_wildcard(&self) -> bool {
        self.projection.len() == 1 && self.projection[0] == Self::WILDCARD
    }

    /// Remember the first clause that received a blank identifier.
    pub(crate) fn note_identifier(&mut self, clause: &'static str, name: &str) {
        if name.trim().is_empty() && self.blank_identifier.is_none() {
            self.blank_identifier = Some(clause);
        }
    }

    pub(crate) fn push_predicate(&mut self, combinator: Combinator, text: String) {
        let combinator = if self.predicates.is_empty() {
            None
        } else {
            Some(combinator)
        };
        self.predicates.push(Predicate { combinator, text });
    }
}
