//! # qsb
//!
//! A fluent MySQL query-string builder.
//!
//! ## Features
//!
//! - **Text only**: builds one SELECT/INSERT/UPDATE/DELETE statement as a string; executing it is up to you
//! - **Quoting**: identifiers are wrapped in backticks per dotted segment (`` `u`.`name` ``)
//! - **Escaping**: literals use MySQL backslash escapes; the `?` placeholder is left for the driver
//! - **Shape checks**: `build()` rejects clauses the selected command cannot carry
//! - **Logging**: rendered statements go to a pluggable [`SqlLogger`], `tracing` by default
//!
//! ## Usage
//!
//! ```ignore
//! use qsb::{QueryStringBuilder, Projection, SortOrder};
//!
//! // SELECT
//! let mut q = QueryStringBuilder::new();
//! q.select(Projection::All)
//!     .from("users", None)
//!     .where_("id", "=", 5)
//!     .build()?;
//! assert_eq!(q.to_string(), "SELECT * FROM `users` WHERE `id` = 5;");
//!
//! // INSERT, rows supplied by the driver
//! let mut q = qsb::insert("users");
//! q.values(&["name"], None::<Vec<qsb::Value>>)?.build()?;
//! assert_eq!(q.to_string(), "INSERT INTO `users` (`name`) VALUES ?");
//!
//! // UPDATE
//! let mut q = qsb::update("users");
//! q.set("active", true).where_("id", "=", 7).build()?;
//!
//! // DELETE
//! let mut q = qsb::delete("users");
//! q.where_("id", "is", "NULL").build()?;
//! # Ok::<(), qsb::QsbError>(())
//! ```
//!
//! Untrusted input must only ever reach value positions. Identifiers with `(`
//! or `%`, [`Value::Raw`] and function-call-shaped text in some positions are
//! emitted verbatim; see [`escape`].

pub mod builder;
pub mod error;
pub mod escape;
pub mod logger;
pub mod value;

pub use builder::{
    Clauses, Command, NOT_BUILT, Projection, QueryStringBuilder, SortOrder, delete, insert, select,
    update,
};
pub use error::{QsbError, QsbResult};
pub use escape::{escape_literal, escape_text, format_value, quote_identifier};
pub use logger::{LogConfig, NoopLogger, SqlLogger, TracingSqlLogger};
pub use value::{PLACEHOLDER, Value};
