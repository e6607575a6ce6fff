//! `rsdados onboard` — First-time setup.

use rsdados_config::AppConfig;

pub fn run() -> rsdados_core::Result<()> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("RS-Dados — First-Time Setup");
    println!("===========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Created config.toml at: {}", config_path.display());
    println!("\n📝 Next steps:");
    println!("   1. Set OPENAI_API_KEY (environment or .env) or add api_key to the file");
    println!("   2. Run: rsdados ask \"Qual foi o PIB do RS em 2022?\"");
    println!("   3. Or serve the HTTP API: rsdados serve\n");

    Ok(())
}
