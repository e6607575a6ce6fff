//! LLM gateway, the only place that talks to the completion provider.
//!
//! `complete` never fails: a missing credential and every provider error are
//! turned into a labeled answer string, so callers need no error handling of
//! their own.

use std::sync::Arc;

use rsdados_config::AppConfig;
use rsdados_core::{Message, Provider, ProviderError, ProviderRequest};
use tracing::{debug, error, warn};

pub const CONFIG_ERROR_PREFIX: &str = "[erro de configuração]";
pub const LLM_ERROR_PREFIX: &str = "[erro LLM]";

/// Wraps an optional provider with the model settings of one deployment.
pub struct LlmGateway {
    provider: Option<Arc<dyn Provider>>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    /// Why `provider` is absent
    unavailable: Option<String>,
}

impl LlmGateway {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider),
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
            unavailable: None,
        }
    }

    /// A gateway that answers every call with the configuration error.
    pub fn unconfigured(model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: None,
            model: model.into(),
            temperature: 0.2,
            max_tokens: None,
            unavailable: Some(reason.into()),
        }
    }

    /// Resolve the provider once from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let gateway = match rsdados_providers::build_from_config(config) {
            Ok(provider) => Self::new(provider, &config.model),
            Err(e) => {
                if matches!(e, ProviderError::NotConfigured(_)) {
                    warn!(provider = %config.provider, "No LLM credential configured");
                } else {
                    error!(provider = %config.provider, error = %e, "Failed to build LLM provider");
                }
                Self::unconfigured(&config.model, e.to_string())
            }
        };
        gateway.with_sampling(config.temperature, config.max_tokens)
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the messages and return the answer text or a labeled error.
    pub async fn complete(&self, messages: &[Message]) -> String {
        let Some(provider) = &self.provider else {
            return config_error_text(self.unavailable.as_deref());
        };

        let request = ProviderRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        match provider.complete(request).await {
            Ok(response) => {
                debug!(
                    provider = provider.name(),
                    model = %response.model,
                    total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
                    "LLM answered"
                );
                response.message.content
            }
            Err(e) => {
                warn!(
                    provider = provider.name(),
                    model = %self.model,
                    error = %e,
                    "LLM call failed"
                );
                format!("{LLM_ERROR_PREFIX} {e}")
            }
        }
    }
}

fn config_error_text(reason: Option<&str>) -> String {
    let detail = reason.map(|r| format!(" ({r})")).unwrap_or_default();
    format!(
        "{CONFIG_ERROR_PREFIX} O modelo de linguagem não está configurado{detail}. \
         Defina OPENAI_API_KEY (ou RSDADOS_API_KEY) no ambiente, em um arquivo .env \
         ou em ~/.rsdados/config.toml e reinicie o serviço."
    )
}
