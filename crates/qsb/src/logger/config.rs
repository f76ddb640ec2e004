use std::sync::OnceLock;
use tracing::Level;

/// Environment variables whose value marks a production deployment when it
/// contains `prod` (case-insensitive).
pub const PRODUCTION_ENV_VARS: [&str; 2] = ["NODE_ENV", "ENV_TYPE"];

/// Environment variable holding the process-manager instance id.
pub const PM_ID_ENV_VAR: &str = "pm_id";

/// Configuration for [`TracingSqlLogger`](super::TracingSqlLogger).
///
/// By default events are marked for the console and emitted at `DEBUG`.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Keep SQL events off the console (production deployments).
    pub production: bool,
    /// Process-manager instance id, used to tag events.
    pub pm_id: Option<String>,
    /// OS process id, used to tag events.
    pub pid: u32,
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            production: false,
            pm_id: None,
            pid: std::process::id(),
            level: Level::DEBUG,
            max_sql_length: None,
        }
    }
}

impl LogConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `NODE_ENV`, `ENV_TYPE` and `pm_id` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let production = PRODUCTION_ENV_VARS
            .iter()
            .filter_map(|key| lookup(*key))
            .any(|value| value.to_lowercase().contains("prod"));
        let pm_id = lookup(PM_ID_ENV_VAR).filter(|id| !id.trim().is_empty());

        Self {
            production,
            pm_id,
            ..Self::default()
        }
    }

    /// Process-wide configuration, read from the environment once.
    pub fn global() -> &'static LogConfig {
        static GLOBAL: OnceLock<LogConfig> = OnceLock::new();
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Mark the configuration as production (no console echo).
    pub fn production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    /// Set the process-manager instance id.
    pub fn pm_id(mut self, pm_id: impl Into<String>) -> Self {
        self.pm_id = Some(pm_id.into());
        self
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Event tag: `<pm_id>:<pid>`, or just `<pid>` outside a process manager.
    pub fn tag(&self) -> String {
        match &self.pm_id {
            Some(pm_id) => format!("{}:{}", pm_id, self.pid),
            None => self.pid.to_string(),
        }
    }
}
