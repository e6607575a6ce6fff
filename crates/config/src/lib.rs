//! Configuration loading, validation, and management for RS-Dados.
//!
//! Loads configuration from `~/.rsdados/config.toml` with environment
//! variable overrides (a local `.env` file is honored). Validates all
//! settings at startup.

use rsdados_core::Capability;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.rsdados/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API credential for the LLM provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// LLM provider name
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Override for the provider's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Max tokens per LLM response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// HTTP server configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Short-term query memory
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Dataset tool settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Persona configuration
    #[serde(default)]
    pub identity: IdentityConfig,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("gateway", &self.gateway)
            .field("memory", &self.memory)
            .field("tools", &self.tools)
            .field("identity", &self.identity)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8010
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// How many recent queries are kept as context
    #[serde(default = "default_memory_capacity")]
    pub capacity: usize,
}

fn default_memory_capacity() -> usize {
    10
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_memory_capacity(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Base URL of the IBGE SIDRA values API
    #[serde(default = "default_sidra_base_url")]
    pub sidra_base_url: String,

    /// Timeout for outbound dataset requests, in seconds
    #[serde(default = "default_tool_timeout")]
    pub timeout_secs: u64,

    /// Capabilities forced to their stub (e.g. `["web_search"]`)
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_sidra_base_url() -> String {
    "https://apisidra.ibge.gov.br/values".into()
}
fn default_tool_timeout() -> u64 {
    30
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            sidra_base_url: default_sidra_base_url(),
            timeout_secs: default_tool_timeout(),
            disabled: vec![],
        }
    }
}

impl ToolsConfig {
    /// Whether the operator disabled this capability.
    pub fn is_disabled(&self, capability: Capability) -> bool {
        self.disabled
            .iter()
            .any(|name| name.trim() == capability.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Replace the built-in persona prompt entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt_override: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.rsdados/config.toml).
    ///
    /// A `.env` file in the working directory is read first. Then:
    /// - `RSDADOS_API_KEY`, falling back to `OPENAI_API_KEY`
    /// - `RSDADOS_MODEL`, falling back to `OPENAI_MODEL`
    /// - `RSDADOS_API_URL`
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.drop_blank_credentials();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("RSDADOS_API_KEY").or_else(|| non_empty("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = non_empty("RSDADOS_MODEL").or_else(|| non_empty("OPENAI_MODEL")) {
            self.model = model;
        }
        if let Some(url) = non_empty("RSDADOS_API_URL") {
            self.api_url = Some(url);
        }
    }

    /// A blank `api_key` or `api_url` in the file means "not set".
    fn drop_blank_credentials(&mut self) {
        self.api_key = self.api_key.take().filter(|k| !k.trim().is_empty());
        self.api_url = self.api_url.take().filter(|u| !u.trim().is_empty());
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".rsdados")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.memory.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "memory.capacity must be > 0".into(),
            ));
        }

        if self.tools.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tools.timeout_secs must be > 0".into(),
            ));
        }

        if let Some(bad) = self
            .tools
            .disabled
            .iter()
            .find(|name| name.parse::<Capability>().is_err())
        {
            return Err(ConfigError::ValidationError(format!(
                "tools.disabled contains unknown capability '{bad}'"
            )));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            provider: default_provider(),
            api_url: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            gateway: GatewayConfig::default(),
            memory: MemoryConfig::default(),
            tools: ToolsConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigError> for rsdados_core::Error {
    fn from(e: ConfigError) -> Self {
        rsdados_core::Error::Config {
            message: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.gateway.port, 8010);
        assert_eq!(config.memory.capacity, 10);
        assert_eq!(config.tools.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.model, config.model);
        assert_eq!(parsed.tools.sidra_base_url, config.tools.sidra_base_url);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_disabled_capability_rejected() {
        let mut config = AppConfig::default();
        config.tools.disabled = vec!["weather".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("weather"));
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.provider, "openai");
        assert!(!config.has_api_key());
    }

    #[test]
    fn load_from_file_with_partial_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
model = "gpt-4o"

[gateway]
port = 9000

[tools]
disabled = ["web_search"]
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert!(config.tools.is_disabled(Capability::WebSearch));
        assert!(!config.tools.is_disabled(Capability::RegionalGdp));
    }

    #[test]
    fn blank_key_in_file_is_not_a_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"  \"\napi_url = \"\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert!(config.api_key.is_none());
        assert!(config.api_url.is_none());
        assert!(!config.has_api_key());
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_prefer_project_prefix() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-openai"),
            ("RSDADOS_API_KEY", "sk-rsdados"),
            ("OPENAI_MODEL", "gpt-4.1"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.api_key.as_deref(), Some("sk-rsdados"));
        assert_eq!(config.model, "gpt-4.1");
        assert!(config.api_url.is_none());
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut config = AppConfig::default();
        config.apply_env(|k| (k == "OPENAI_API_KEY").then(|| "  ".to_string()));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("sk-secret"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("apisidra.ibge.gov.br"));
    }

    #[test]
    fn config_error_converts_to_core_error() {
        let err: rsdados_core::Error = ConfigError::ValidationError("bad".into()).into();
        assert!(matches!(err, rsdados_core::Error::Config { .. }));
        assert!(err.to_string().contains("bad"));
    }
}
