//! Intent router: maps a free-text question to the capabilities to run.
//!
//! A plain ordered rule list: each rule owns a keyword set and yields its
//! capability when any keyword is a substring of the lower-cased query. Every
//! matching rule contributes, in rule order. No rule matching means web search.
//! There is no scoring and no ambiguity resolution.

use rsdados_core::Capability;

/// One keyword rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pub capability: Capability,
    pub keywords: Vec<String>,
}

impl Rule {
    pub fn new(capability: Capability, keywords: &[&str]) -> Self {
        Self {
            capability,
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    fn matches(&self, normalized_query: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| normalized_query.contains(k.as_str()))
    }
}

/// Deterministic keyword classifier with a guaranteed fallback.
#[derive(Debug, Clone)]
pub struct IntentRouter {
    rules: Vec<Rule>,
    fallback: Capability,
}

impl IntentRouter {
    pub fn new(rules: Vec<Rule>, fallback: Capability) -> Self {
        Self { rules, fallback }
    }

    /// Capabilities for the query, in rule order, never empty.
    pub fn route(&self, query: &str) -> Vec<Capability> {
        let normalized = query.to_lowercase();
        let mut routed: Vec<Capability> = Vec::new();
        for rule in &self.rules {
            if !routed.contains(&rule.capability) && rule.matches(&normalized) {
                routed.push(rule.capability);
            }
        }
        if routed.is_empty() {
            routed.push(self.fallback);
        }
        routed
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn fallback(&self) -> Capability {
        self.fallback
    }
}

impl Default for IntentRouter {
    /// Portuguese domain vocabulary for economy, population, health and budget.
    fn default() -> Self {
        Self::new(
            vec![
                Rule::new(
                    Capability::RegionalGdp,
                    &[
                        "pib",
                        "contas regionais",
                        "economia",
                        "emprego",
                        "exporta",
                        "indústria",
                        "industria",
                        "agro",
                    ],
                ),
                Rule::new(
                    Capability::TopMunicipalities,
                    &["popula", "município", "municipio", "cidades"],
                ),
                Rule::new(
                    Capability::HealthIndicators,
                    &[
                        "saúde",
                        "saude",
                        "leitos",
                        "epidem",
                        "datasus",
                        "sus",
                        "morbidade",
                    ],
                ),
                Rule::new(
                    Capability::BudgetExecution,
                    &[
                        "orçament",
                        "orcament",
                        "receita",
                        "despesa",
                        "execução",
                        "execucao",
                        "gasto público",
                    ],
                ),
            ],
            Capability::WebSearch,
        )
    }
}
