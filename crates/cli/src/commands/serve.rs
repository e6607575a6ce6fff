//! `rsdados serve` — Start the HTTP chat server.

use rsdados_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> rsdados_core::Result<()> {
    let mut config = AppConfig::load()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("RS-Dados Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model);
    if !config.has_api_key() {
        println!("   ⚠️  No API key set, answers will carry a configuration error");
    }

    rsdados_gateway::start(config).await?;

    Ok(())
}
