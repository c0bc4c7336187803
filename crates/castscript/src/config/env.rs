//! Environment-based configuration.

use std::collections::HashMap;

/// Environment configuration prefix.
pub const DEFAULT_PREFIX: &str = "CASTSCRIPT";

/// Environment variable reader.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Prefix for environment variables.
    prefix: String,
    /// Values that take precedence over the process environment.
    overrides: HashMap<String, String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl EnvConfig {
    /// Create a new environment config reader.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            overrides: HashMap::new(),
        }
    }

    /// Set a value without touching the process environment.
    #[must_use]
    pub fn with_override(mut self, name: &str, value: impl Into<String>) -> Self {
        self.overrides.insert(self.var_name(name), value.into());
        self
    }

    /// Build the full environment variable name.
    fn var_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_uppercase()
        } else {
            format!("{}_{}", self.prefix, name.to_uppercase())
        }
    }

    /// Get a string value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        let var_name = self.var_name(name);
        self.overrides
            .get(&var_name)
            .cloned()
            .or_else(|| std::env::var(&var_name).ok())
    }

    /// Get a parsed value.
    #[must_use]
    pub fn parse<T: std::str::FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }
}
