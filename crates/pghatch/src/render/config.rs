use serde::{Deserialize, Serialize};

use crate::error::QbResult;

/// Postgres wire protocol limit on bind parameters per statement.
pub const MAX_PARAMS: usize = 65535;

/// When identifiers get double-quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotePolicy {
    /// Quote only reserved words and names outside `[a-z_][a-z0-9_$]*`.
    #[default]
    WhenNeeded,
    /// Quote every identifier.
    Always,
}

/// Configuration for rendering statements.
///
/// Builders use [`RenderConfig::default()`]; pass an explicit one through
/// `build_with`. Loadable from JSON with every field optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Identifier quoting policy.
    pub quote_identifiers: QuotePolicy,
    /// Maximum number of placeholders in one statement.
    pub max_params: usize,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub log_sql_max_len: Option<usize>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quote_identifiers: QuotePolicy::WhenNeeded,
            max_params: MAX_PARAMS,
            log_sql_max_len: Some(200),
        }
    }
}

impl RenderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> QbResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the identifier quoting policy.
    pub fn with_quote_policy(mut self, policy: QuotePolicy) -> Self {
        self.quote_identifiers = policy;
        self
    }

    /// Set the placeholder limit. Values above the protocol limit are clamped.
    pub fn with_max_params(mut self, max: usize) -> Self {
        self.max_params = max.min(MAX_PARAMS);
        self
    }

    /// Set maximum SQL length in log events.
    pub fn with_log_sql_max_len(mut self, len: usize) -> Self {
        self.log_sql_max_len = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_log_truncate(mut self) -> Self {
        self.log_sql_max_len = None;
        self
    }
}
