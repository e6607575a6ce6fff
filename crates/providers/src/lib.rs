//! LLM Provider implementations for RS-Dados.
//!
//! All providers implement the `rsdados_core::Provider` trait.
//! [`build_from_config`] picks the backend named in configuration.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use std::sync::Arc;

use rsdados_config::AppConfig;
use rsdados_core::error::ProviderError;
use rsdados_core::provider::Provider;

/// Build the configured provider.
///
/// Fails with [`ProviderError::NotConfigured`] when the provider needs a
/// credential and none is set.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let needs_key = config.provider != "ollama";
    let configured_key = config
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    let api_key = match (configured_key, needs_key) {
        (Some(key), _) => key.to_string(),
        (None, false) => "ollama".to_string(),
        (None, true) => {
            return Err(ProviderError::NotConfigured(format!(
                "no API key for provider '{}'",
                config.provider
            )));
        }
    };

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let provider = OpenAiCompatProvider::new(&config.provider, base_url, api_key)?;
    Ok(Arc::new(provider))
}

/// Get the default base URL for well-known providers.
pub fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_base_urls() {
        assert!(default_base_url("openai").contains("api.openai.com"));
        assert!(default_base_url("openrouter").contains("openrouter.ai"));
        assert!(default_base_url("ollama").contains("localhost:11434"));
    }

    #[test]
    fn missing_key_is_not_configured() {
        let config = AppConfig::default();
        let err = build_from_config(&config).err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn blank_key_is_not_configured() {
        for key in ["", "   "] {
            let config = AppConfig {
                api_key: Some(key.into()),
                ..AppConfig::default()
            };
            let err = build_from_config(&config).err().unwrap();
            assert!(matches!(err, ProviderError::NotConfigured(_)), "key {key:?}");
        }
    }

    #[test]
    fn builds_with_key() {
        let config = AppConfig {
            api_key: Some("sk-test".into()),
            ..AppConfig::default()
        };
        let provider = build_from_config(&config).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn ollama_needs_no_key() {
        let config = AppConfig {
            provider: "ollama".into(),
            ..AppConfig::default()
        };
        assert!(build_from_config(&config).is_ok());
    }
}
