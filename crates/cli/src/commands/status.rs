//! `rsdados status` — Show configuration and tool bindings.

use rsdados_config::AppConfig;
use rsdados_core::Capability;

pub fn run() -> rsdados_core::Result<()> {
    let config = AppConfig::load()?;
    let registry = rsdados_tools::default_registry(&config.tools);

    println!("RS-Dados Status");
    println!("===============");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Provider:     {}", config.provider);
    println!("  Model:        {}", config.model);
    println!("  Temperature:  {}", config.temperature);
    let key_state = if config.has_api_key() { "set" } else { "missing" };
    println!("  API key:      {key_state}");
    println!("  Memory:       {} queries", config.memory.capacity);
    println!("  Gateway:      {}:{}", config.gateway.host, config.gateway.port);
    println!(
        "  SIDRA:        {} ({}s timeout)",
        config.tools.sidra_base_url, config.tools.timeout_secs
    );

    println!("\n  Tools:");
    for capability in Capability::ALL {
        let binding = match registry.get(capability) {
            Some(tool) if registry.is_stub(capability) => format!("{} (stub)", tool.name()),
            Some(tool) => tool.name().to_string(),
            None => "unbound".to_string(),
        };
        println!("    {:<20} {binding}", capability.as_str());
    }

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `rsdados onboard` first");
    }

    Ok(())
}
