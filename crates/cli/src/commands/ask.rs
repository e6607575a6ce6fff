//! `rsdados ask` — Answer one question on stdout.

use rsdados_agent::Orchestrator;
use rsdados_config::AppConfig;

pub async fn run(question: String) -> rsdados_core::Result<()> {
    let config = AppConfig::load()?;
    let orchestrator = Orchestrator::from_config(&config);
    let answer = orchestrator.answer(question.trim()).await;
    println!("{answer}");

    Ok(())
}
