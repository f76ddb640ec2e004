//! Logging handoff for rendered statements.
//!
//! The builder never writes logs itself; it hands the rendered text (and any
//! parameters the caller passes along) to a [`SqlLogger`]. Loggers are
//! fire-and-forget: they return nothing and must not panic, so a logging
//! problem can never break a builder chain.
//!
//! The default logger is [`TracingSqlLogger`], configured from the process
//! environment through [`LogConfig::from_env`]. Where the events end up (console,
//! daily-rotated files, ...) is decided by the `tracing` subscriber the
//! application installs. In production every event still reaches the
//! subscriber with `console = false`, so a console layer can filter on that
//! field while the file layer keeps the full SQL log.
//!
//! # Example
//!
//! ```rust,ignore
//! use qsb::logger::{LogConfig, TracingSqlLogger};
//! use qsb::QueryStringBuilder;
//! use std::sync::Arc;
//!
//! let logger = TracingSqlLogger::with_config(LogConfig::from_env().max_sql_length(500));
//! let mut q = QueryStringBuilder::with_logger(Arc::new(logger));
//! q.delete("sessions").where_("expires_at", "<", "NOW()").build()?.print_string();
//! ```

mod config;
mod tracing_logger;


pub use config::LogConfig;
pub use tracing_logger::TracingSqlLogger;

use crate::value::Value;
use std::sync::{Arc, OnceLock};

/// Receives rendered statements from a builder.
pub trait SqlLogger: Send + Sync {
    /// Called with the rendered statement and the caller's parameters.
    fn log_sql(&self, sql: &str, params: &[Value]);

    /// Called with a JSON dump of a builder's accumulated clauses.
    fn log_state(&self, state: &str) {
        self.log_sql(state, &[]);
    }
}

/// A logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl SqlLogger for NoopLogger {
    fn log_sql(&self, _sql: &str, _params: &[Value]) {}

    fn log_state(&self, _state: &str) {}
}

static DEFAULT_LOGGER: OnceLock<Arc<dyn SqlLogger>> = OnceLock::new();

/// The logger used by [`QueryStringBuilder::new`](crate::QueryStringBuilder::new).
///
/// Unless [`set_default_logger`] ran first, this is a [`TracingSqlLogger`]
/// built from [`LogConfig::global`].
pub fn default_logger() -> Arc<dyn SqlLogger> {
    DEFAULT_LOGGER
        .get_or_init(|| Arc::new(TracingSqlLogger::with_config(LogConfig::global().clone())))
        .clone()
}

/// Install the process-wide default logger.
///
/// Returns `false` if a default logger was already in use.
pub fn set_default_logger(logger: Arc<dyn SqlLogger>) -> bool {
    DEFAULT_LOGGER.set(logger).is_ok()
}

/// Truncate `sql` to at most `max_bytes` bytes without splitting a UTF-8 character.
pub(crate) fn truncate_at_char_boundary(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
