//! Dataset tool implementations for RS-Dados.
//!
//! Each capability is bound to a tool here: the IBGE SIDRA fetchers, the web
//! search placeholder and the table formatter. Integrations that do not exist
//! yet (DataSUS health indicators, state budget execution) are bound to stubs.

pub mod sidra;
pub mod table_format;
pub mod web_search;

use rsdados_config::ToolsConfig;
use rsdados_core::capability::Capability;
use rsdados_core::error::ToolError;
use rsdados_core::tool::{Tool, ToolRegistry};
use tracing::info;

pub use sidra::{RegionalGdpTool, SidraClient, TopMunicipalitiesTool};
pub use table_format::TableFormatTool;
pub use web_search::WebSearchTool;

/// Build the registry with every capability bound.
///
/// Binding policy:
/// - capabilities listed in `config.disabled` get a stub
/// - a real tool whose construction fails gets a stub carrying the error
/// - capabilities without an integration get a stub
pub fn default_registry(config: &ToolsConfig) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let sidra = SidraClient::from_config(config);

    for capability in Capability::ALL {
        if config.is_disabled(capability) {
            registry.register_stub(capability, "desativada na configuração");
            continue;
        }

        let tool: Result<Box<dyn Tool>, ToolError> = match capability {
            Capability::RegionalGdp => sidra
                .clone()
                .map(|c| Box::new(RegionalGdpTool::new(c)) as Box<dyn Tool>),
            Capability::TopMunicipalities => sidra
                .clone()
                .map(|c| Box::new(TopMunicipalitiesTool::new(c)) as Box<dyn Tool>),
            Capability::HealthIndicators => Err(ToolError::NotConfigured(
                "integração DataSUS não disponível".into(),
            )),
            Capability::BudgetExecution => Err(ToolError::NotConfigured(
                "integração Transparência RS não disponível".into(),
            )),
            Capability::WebSearch => Ok(Box::new(WebSearchTool)),
            Capability::TableFormat => Ok(Box::new(TableFormatTool)),
        };
        registry.bind(capability, tool);
    }

    info!(
        bound = registry.capabilities().len(),
        stubs = ?registry.stubs(),
        "Tool registry ready"
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_capability_is_bound() {
        let registry = default_registry(&ToolsConfig::default());
        for cap in Capability::ALL {
            assert!(registry.get(cap).is_some(), "{cap} missing");
        }
    }

    #[test]
    fn unavailable_integrations_are_stubs() {
        let registry = default_registry(&ToolsConfig::default());
        assert_eq!(
            registry.stubs(),
            vec![Capability::HealthIndicators, Capability::BudgetExecution]
        );
        assert_eq!(
            registry.get(Capability::RegionalGdp).unwrap().name(),
            "sidra_pib_rs"
        );
    }

    #[tokio::test]
    async fn disabled_capability_answers_as_stub() {
        let config = ToolsConfig {
            disabled: vec!["web_search".into()],
            ..ToolsConfig::default()
        };
        let registry = default_registry(&config);
        assert!(registry.is_stub(Capability::WebSearch));

        let out = registry
            .get(Capability::WebSearch)
            .unwrap()
            .run("qualquer coisa")
            .await
            .unwrap();
        assert!(out.render().contains("desativada"));
        assert_eq!(out.sources, vec!["web_search • stub".to_string()]);
    }
}
