//! The question-answering pipeline.
//!
//! memory push → route → execute tools → assemble prompt → LLM gateway.
//! An answer string is always produced.

use std::sync::{Arc, Mutex};
use std::time::Instant;

use rsdados_config::AppConfig;
use rsdados_core::{Capability, Message, ToolRegistry};
use tracing::info;

use crate::execution::{self, Execution};
use crate::llm::LlmGateway;
use crate::memory::QueryMemory;
use crate::prompt::{self, DEFAULT_PERSONA};
use crate::router::IntentRouter;

/// Prepared request: the routed capabilities, what the tools produced and the
/// messages sent to the model.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub capabilities: Vec<Capability>,
    pub execution: Execution,
    pub messages: Vec<Message>,
}

pub struct Orchestrator {
    registry: Arc<ToolRegistry>,
    router: IntentRouter,
    memory: Mutex<QueryMemory>,
    gateway: LlmGateway,
    persona: String,
}

impl Orchestrator {
    pub fn new(registry: Arc<ToolRegistry>, gateway: LlmGateway) -> Self {
        Self {
            registry,
            router: IntentRouter::default(),
            memory: Mutex::new(QueryMemory::default()),
            gateway,
            persona: DEFAULT_PERSONA.to_string(),
        }
    }

    /// Wire the real tools and provider from configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        let registry = Arc::new(rsdados_tools::default_registry(&config.tools));
        let persona = config
            .identity
            .system_prompt_override
            .clone()
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        Self::new(registry, LlmGateway::from_config(config))
            .with_memory(QueryMemory::new(config.memory.capacity))
            .with_persona(persona)
    }

    pub fn with_router(mut self, router: IntentRouter) -> Self {
        self.router = router;
        self
    }

    pub fn with_memory(mut self, memory: QueryMemory) -> Self {
        self.memory = Mutex::new(memory);
        self
    }

    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = persona.into();
        self
    }

    pub fn router(&self) -> &IntentRouter {
        &self.router
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn gateway(&self) -> &LlmGateway {
        &self.gateway
    }

    /// Oldest first.
    pub fn memory_snapshot(&self) -> Vec<String> {
        self.lock_memory().snapshot()
    }

    /// Everything up to, but not including, the LLM call. Records the query
    /// in memory.
    pub async fn prepare(&self, query: &str) -> Prepared {
        let memory = {
            let mut memory = self.lock_memory();
            memory.push(query);
            memory.snapshot()
        };

        let capabilities = self.router.route(query);
        let execution = execution::execute(&self.registry, query, &capabilities).await;
        let messages = prompt::assemble(&self.persona, &memory, query, &execution);

        Prepared {
            capabilities,
            execution,
            messages,
        }
    }

    /// Answer one question.
    pub async fn answer(&self, query: &str) -> String {
        let started = Instant::now();
        let prepared = self.prepare(query).await;
        let answer = self.gateway.complete(&prepared.messages).await;

        info!(
            capabilities = ?prepared.capabilities,
            failures = prepared.execution.failures(),
            sources = prepared.execution.sources.len(),
            model = self.gateway.model(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Question answered"
        );
        answer
    }

    // A poisoned lock still holds a usable buffer.
    fn lock_memory(&self) -> std::sync::MutexGuard<'_, QueryMemory> {
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rsdados_core::{Provider, ProviderError, ProviderRequest, ProviderResponse, Role};
    use rsdados_core::{Tool, ToolError, ToolOutput};

    struct CountingProvider;

    #[async_trait]
    impl Provider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant(format!("recebi {}", request.messages.len())),
                usage: None,
                model: request.model,
            })
        }
    }

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "echoes"
        }
        async fn run(&self, query: &str) -> Result<ToolOutput, ToolError> {
            Ok(ToolOutput::text(format!("eco: {query}")).with_source("eco • teste"))
        }
    }

    fn orchestrator() -> Orchestrator {
        let mut registry = ToolRegistry::new();
        registry.register(Capability::WebSearch, Box::new(Echo));
        Orchestrator::new(
            Arc::new(registry),
            LlmGateway::new(Arc::new(CountingProvider), "m"),
        )
        .with_persona("persona de teste")
    }

    #[tokio::test]
    async fn answer_goes_through_gateway() {
        let orch = orchestrator();
        assert_eq!(orch.answer("olá").await, "recebi 5");
    }

    #[tokio::test]
    async fn prepare_builds_five_messages() {
        let orch = orchestrator();
        let prepared = orch.prepare("curiosidades").await;

        assert_eq!(prepared.capabilities, vec![Capability::WebSearch]);
        assert_eq!(prepared.messages.len(), 5);
        assert_eq!(prepared.messages[0].content, "persona de teste");
        assert_eq!(prepared.messages[1].content, "Contexto/memória: curiosidades");
        assert_eq!(prepared.messages[2].role, Role::User);
        assert_eq!(
            prepared.messages[3].content,
            "Resultados de ferramentas:\neco: curiosidades"
        );
        assert_eq!(prepared.messages[4].content, "Fontes coletadas: eco • teste");
    }

    #[tokio::test]
    async fn memory_includes_current_query_last() {
        let orch = orchestrator();
        orch.answer("primeira").await;
        let prepared = orch.prepare("segunda").await;
        assert_eq!(
            prepared.messages[1].content,
            "Contexto/memória: primeira | segunda"
        );
        assert_eq!(orch.memory_snapshot(), vec!["primeira", "segunda"]);
    }

    #[tokio::test]
    async fn unbound_capability_still_answers() {
        let orch = orchestrator();
        let prepared = orch.prepare("qual o PIB?").await;
        assert_eq!(prepared.capabilities, vec![Capability::RegionalGdp]);
        assert_eq!(
            prepared.messages[3].content,
            "Resultados de ferramentas:\n[regional_gdp] ferramenta não encontrada."
        );
        assert_eq!(prepared.messages[4].content, "Fontes coletadas: —");
    }

    #[tokio::test]
    async fn unconfigured_gateway_answers_with_config_error() {
        let orch = Orchestrator::new(
            Arc::new(ToolRegistry::new()),
            LlmGateway::unconfigured("m", "sem chave"),
        );
        let answer = orch.answer("pergunta").await;
        assert!(answer.starts_with("[erro de configuração]"));
        assert_eq!(orch.memory_snapshot(), vec!["pergunta"]);
    }
}
