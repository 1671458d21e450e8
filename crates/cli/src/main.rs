use anyhow::Context;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Operator entry point for the bookstore service.
#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about = "Bookstore catalog service")]
struct Cli {
    /// Configuration environment (local, staging, production)
    #[arg(long, env = "BOOKSTORE_ENV", default_value = "local")]
    env: String,

    /// Directory holding base.toml and the per-environment overlays
    #[arg(long, env = "BOOKSTORE_CONFIG_DIR", default_value = "config")]
    config_dir: std::path::PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the merged OpenAPI document as JSON
    Openapi,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load_from(&cli.config_dir, &cli.env)
        .with_context(|| format!("failed to load settings from {}", cli.config_dir.display()))?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookstore_telemetry::init(&settings.telemetry)?;
            bookstore_app::run(settings).await
        }
        Command::Openapi => {
            let registry = bookstore_app::bootstrap(&settings).await?;
            let document = bookstore_http::router::openapi_document(&registry);
            println!("{}", serde_json::to_string_pretty(&document)?);
            Ok(())
        }
    }
}
