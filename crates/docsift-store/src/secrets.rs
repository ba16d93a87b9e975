//! Secret providers for API credentials

use docsift_domain::SecretProvider;
use std::collections::HashMap;

/// Fixed in-memory secrets, for tests and tools.
#[derive(Debug, Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretProvider for StaticSecrets {
    fn get_secret(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Secrets read from environment variables.
///
/// Keys are translated to variable names by uppercasing and replacing
/// dots with underscores, so `ai.google_key` reads `AI_GOOGLE_KEY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecrets;

impl EnvSecrets {
    /// Create the provider.
    pub fn new() -> Self {
        EnvSecrets
    }

    fn var_name(key: &str) -> String {
        key.replace('.', "_").to_uppercase()
    }
}

impl SecretProvider for EnvSecrets {
    fn get_secret(&self, key: &str) -> Option<String> {
        std::env::var(Self::var_name(key))
            .ok()
            .filter(|v| !v.is_empty())
    }
}
