//! Configuration for the Extraction Orchestrator

use docsift_llm::GenerationParams;
use serde::{Deserialize, Serialize};

/// Terminal state of a run in which every attachment failed.
///
/// The source systems disagree on this: some call sites report `done` with
/// all-error entries, others `error`. It is a policy choice, not a
/// hard-coded behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllFailedPolicy {
    /// Report `done`; the per-entry errors carry the detail (default)
    MarkDone,
    /// Report `error` with a summary message
    MarkError,
}

impl Default for AllFailedPolicy {
    fn default() -> Self {
        AllFailedPolicy::MarkDone
    }
}

/// Configuration for the Extraction Orchestrator.
///
/// Every field has a default, so a TOML config file may set any subset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Terminal state when every attachment fails
    pub all_failed_policy: AllFailedPolicy,

    /// Maximum characters of text content inlined into a prompt
    pub max_inline_text_chars: usize,

    /// Sampling temperature for document extraction
    pub temperature: f32,

    /// Maximum tokens in the answer
    pub max_output_tokens: u32,

    /// Nucleus sampling threshold
    pub top_p: f32,

    /// Top-k sampling cutoff
    pub top_k: u32,
}

impl OrchestratorConfig {
    /// Generation parameters for document extraction calls.
    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            top_p: self.top_p,
            top_k: self.top_k,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_inline_text_chars == 0 {
            return Err("max_inline_text_chars must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.max_output_tokens == 0 {
            return Err("max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p {} out of range [0.0, 1.0]", self.top_p));
        }
        Ok(())
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for OrchestratorConfig {
    /// Strict extraction defaults (temperature 0.1 for precise output).
    fn default() -> Self {
        let params = GenerationParams::strict();
        Self {
            all_failed_policy: AllFailedPolicy::default(),
            max_inline_text_chars: 5_000,
            temperature: params.temperature,
            max_output_tokens: params.max_output_tokens,
            top_p: params.top_p,
            top_k: params.top_k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = OrchestratorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.all_failed_policy, AllFailedPolicy::MarkDone);
        assert_eq!(config.max_inline_text_chars, 5_000);
    }

    #[test]
    fn test_default_generation_params_are_strict() {
        let params = OrchestratorConfig::default().generation_params();
        assert_eq!(params.temperature, 0.1);
        assert_eq!(params.max_output_tokens, 8192);
        assert_eq!(params.top_p, 0.95);
        assert_eq!(params.top_k, 40);
    }

    #[test]
    fn test_invalid_configs() {
        let mut config = OrchestratorConfig::default();
        config.max_inline_text_chars = 0;
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.temperature = 3.0;
        assert!(config.validate().is_err());

        let mut config = OrchestratorConfig::default();
        config.top_p = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = OrchestratorConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = OrchestratorConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config.all_failed_policy, parsed.all_failed_policy);
        assert_eq!(config.max_inline_text_chars, parsed.max_inline_text_chars);
        assert_eq!(config.max_output_tokens, parsed.max_output_tokens);
    }

    #[test]
    fn test_policy_defaults_when_absent_from_toml() {
        let parsed = OrchestratorConfig::from_toml(
            "max_inline_text_chars = 1000\ntemperature = 0.1\nmax_output_tokens = 8192\ntop_p = 0.95\ntop_k = 40\n",
        )
        .unwrap();
        assert_eq!(parsed.all_failed_policy, AllFailedPolicy::MarkDone);
    }
}
