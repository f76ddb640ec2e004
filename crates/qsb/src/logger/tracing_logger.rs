use super::config::LogConfig;
use super::{SqlLogger, truncate_at_char_boundary};
use crate::value::Value;
use tracing::Level;

/// A `tracing`-based logger for rendered statements.
///
/// Events go to target `qsb.sql`, tagged with the process-manager id and the
/// process id. Every event carries a `console` field that is `false` when
/// [`LogConfig::production`] is set; console layers should drop those events
/// while file layers keep them.
#[derive(Debug, Clone)]
pub struct TracingSqlLogger {
    config: LogConfig,
}

impl Default for TracingSqlLogger {
    fn default() -> Self {
        Self::with_config(LogConfig::global().clone())
    }
}

impl TracingSqlLogger {
    /// Create a logger configured from the process environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a logger with an explicit configuration.
    pub fn with_config(config: LogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Whether events are meant to be echoed to the console.
    pub fn echoes_to_console(&self) -> bool {
        !self.config.production
    }

    pub(crate) fn truncate_sql(&self, sql: &str) -> String {
        match self.config.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_at_char_boundary(sql, max)),
            _ => sql.to_string(),
        }
    }

    pub(crate) fn render_params(params: &[Value]) -> String {
        serde_json::to_string(params).unwrap_or_else(|e| format!("<unserializable: {e}>"))
    }

    fn emit(&self, kind: &'static str, sql: &str, params: &[Value]) {
        /// Dispatch a tracing event at a runtime-determined level.
        macro_rules! emit_at_level {
            ($level:expr, $($field:tt)*) => {
                match $level {
                    Level::ERROR => tracing::error!($($field)*),
                    Level::WARN  => tracing::warn!($($field)*),
                    Level::INFO  => tracing::info!($($field)*),
                    Level::DEBUG => tracing::debug!($($field)*),
                    _ => tracing::trace!($($field)*),
                }
            };
        }

        let tag = self.config.tag();
        let sql = self.truncate_sql(sql);
        let param_count = params.len();
        let params = Self::render_params(params);
        emit_at_level!(
            self.config.level,
            target: "qsb.sql",
            kind,
            console = self.echoes_to_console(),
            tag = %tag,
            param_count,
            params = %params,
            sql = %sql,
        );
    }
}

impl SqlLogger for TracingSqlLogger {
    fn log_sql(&self, sql: &str, params: &[Value]) {
        self.emit("sql", sql, params);
    }

    fn log_state(&self, state: &str) {
        self.emit("state", state, &[]);
    }
}
