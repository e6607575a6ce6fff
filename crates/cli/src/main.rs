//! RS-Dados CLI — the main entry point.
//!
//! Commands:
//! - `serve`    — Start the HTTP chat server
//! - `ask`      — Answer a single question and exit
//! - `route`    — Show which capabilities a question routes to
//! - `onboard`  — Write the default config file
//! - `status`   — Show configuration and tool bindings

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "rsdados",
    about = "RS-Dados Conversacional — public data of Rio Grande do Sul",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Ask one question
    Ask {
        /// The question, in Portuguese
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Print the capabilities a question routes to
    Route {
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Create ~/.rsdados/config.toml with defaults
    Onboard,

    /// Show configuration and tool bindings
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve { port } => commands::serve::run(port).await?,
        Commands::Ask { question } => commands::ask::run(question.join(" ")).await?,
        Commands::Route { question } => commands::route::run(question.join(" "))?,
        Commands::Onboard => commands::onboard::run()?,
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
